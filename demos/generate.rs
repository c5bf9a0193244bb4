use std::error::Error;

use qrgenius::{
    export, reader::decode_image, BadgeStyle, Content, CornerRadius, DecodeOutcome, Decorations, ECLevel,
    ExportFormat, Logo, QRBuilder, Style,
};
use tracing_subscriber::EnvFilter;

// Usage: cargo run --example generate -- [data] [style] [logo.png]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "https://example.com".to_string());
    let style = match args.next() {
        Some(s) => serde_json::from_value::<Style>(serde_json::Value::String(s))?,
        None => Style::Dots,
    };
    let logo = args.next().map(|path| std::fs::read(path).map_err(Box::<dyn Error>::from)).transpose()?;

    // Links are validated, anything else is encoded as text
    let data = Content::infer(&input).payload()?;

    let qr = QRBuilder::new(data.as_bytes())
        .style(style)                          // Module style - defaults to standard
        .ec_level(ECLevel::H)                  // Error correction level - defaults to M
        .corner_radius(CornerRadius::Rounded)  // Extra rounding of data modules - defaults to square
        .width(600)                            // Canvas side - defaults to 300
        .build()?;

    let decorations = Decorations {
        logo: logo.as_deref().map(Logo::from_bytes).transpose()?,
        badge: Some(BadgeStyle::default()),
        ..Default::default()
    };

    let png = export(&qr, &decorations, ExportFormat::Png, "")?;
    std::fs::write(&png.file_name, &png.bytes)?;
    println!("Styled QR code saved to: {}", png.file_name);

    let svg = export(&qr, &Decorations::default(), ExportFormat::Svg, "")?;
    std::fs::write(&svg.file_name, &svg.bytes)?;
    println!("Plain svg saved to: {}", svg.file_name);

    match decode_image(&png.bytes)? {
        DecodeOutcome::Found(text) => println!("Decoded back: {text}"),
        DecodeOutcome::NotFound => println!("Couldn't decode the generated code"),
    }

    Ok(())
}
