use image::{Rgb, RgbImage};
use kmeans_quantizer::quantize;
use std::path::Path;

fn main() {
    env_logger::init();
    println!("Starting k-means color quantizer.");

    let input = "quantize_input.png";
    let output = "quantize_output.png";
    let n_colors = 4;

    // Generate a synthetic test image if none exists
    if !Path::new(input).exists() {
        println!("Generating synthetic test image...");
        let img = RgbImage::from_fn(128, 128, |x, y| {
            // Four color quadrants with a mild diagonal gradient
            let shade = ((x + y) % 32) as u8;
            match (x < 64, y < 64) {
                (true, true) => Rgb([200 + shade, 30, 30]),
                (false, true) => Rgb([30, 200 + shade, 30]),
                (true, false) => Rgb([30, 30, 200 + shade]),
                (false, false) => Rgb([200 + shade, 200 + shade, 30]),
            }
        });
        if let Err(e) = img.save(input) {
            eprintln!("Failed to write test image: {e}");
            return;
        }
        println!("Test image saved to {input}");
    }

    println!("Quantizing {input} down to {n_colors} colors...");
    match quantize::quantize_image(input, output, n_colors, 100) {
        Ok(true) => println!("Quantized image written to {output}"),
        Ok(false) => eprintln!("Quantization finished but {output} could not be written"),
        Err(e) => eprintln!("Quantization failed: {e}"),
    }
}
