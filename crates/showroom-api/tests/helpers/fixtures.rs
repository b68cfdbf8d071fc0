//! Test fixtures: small images and multipart forms.

#![allow(dead_code)]

use std::io::Cursor;

use axum_test::multipart::{MultipartForm, Part};

/// Solid-colour PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([180, 20, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("Failed to encode test PNG");
    out.into_inner()
}

pub fn png_part(name: &str) -> Part {
    Part::bytes(png(8, 8)).file_name(name).mime_type("image/png")
}

pub fn pdf_part(name: &str) -> Part {
    Part::bytes(b"%PDF-1.4\n%%EOF\n".to_vec())
        .file_name(name)
        .mime_type("application/pdf")
}

/// Every required car field with valid values.
pub fn car_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "2019 Corolla")
        .add_text("make", "Toyota")
        .add_text("model", "Corolla")
        .add_text("manufacturing_year", "2019-05-01")
        .add_text("body_type", "Sedan")
        .add_text("price", "15000")
        .add_text("currency", "USD")
        .add_text("mileage", "42000")
        .add_text("mileage_unit", "km")
        .add_text("fuel_type", "Petrol")
}

/// Every required project field with valid values.
pub fn project_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "Delivery App")
        .add_text("mainCategory", "Mobile")
        .add_text("client", "Acme")
        .add_text("duration", "3 months")
        .add_text("downloads", "10k+")
        .add_text("categories", r#"["mobile","logistics"]"#)
        .add_text("description", "Courier tracking")
        .add_text("listOnWebsite", "true")
}
