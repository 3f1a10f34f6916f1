use image::RgbImage;
use qrframe::render::{render, RenderOptions};
use qrframe::{build_payload, generate_qr_code, Category, Color, Frame, QrCodeEcc};

fn decode(img: &RgbImage) -> String {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| {
            let [r, g, b] = img.get_pixel(x as u32, y as u32).0;
            ((u32::from(r) + u32::from(g) + u32::from(b)) / 3) as u8
        },
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code in the image");
    let (_meta, content) = grids[0].decode().expect("decoding rendered QR code");
    content
}

#[test]
fn local_pdf_scenario_round_trips() {
    let payload = build_payload(Category::LocalPdf, "/content/marina-samprovalaki.pdf").unwrap();
    assert_eq!(payload, "file:///content/marina-samprovalaki.pdf");

    let options = RenderOptions {
        module_size: 10,
        border: 4,
        frame: Some(Frame {
            thickness: 20,
            color: Color::BLACK,
        }),
        ..RenderOptions::default()
    };
    let img = render(&payload, &options).unwrap();
    assert_eq!(decode(&img), payload);
}

#[test]
fn every_ecc_level_round_trips() {
    let payload = "https://example.com/file.pdf";
    for ecc in QrCodeEcc::ALL {
        for module_size in [3, 10] {
            let options = RenderOptions {
                module_size,
                ecc,
                ..RenderOptions::default()
            };
            let img = render(payload, &options).unwrap();
            assert_eq!(decode(&img), payload, "ecc {ecc}, module size {module_size}");
        }
    }
}

#[test]
fn unframed_and_colored_round_trip() {
    let payload = "https://twitter.com/username";
    let options = RenderOptions {
        module_size: 5,
        border: 2,
        fill: Color([0, 0, 128]),
        background: Color::WHITE,
        frame: None,
        ..RenderOptions::default()
    };
    let img = render(payload, &options).unwrap();
    assert_eq!(decode(&img), payload);
}

#[test]
fn longer_payload_round_trips() {
    let payload = format!("https://example.com/?q={}", "abcdefghij".repeat(20));
    let options = RenderOptions {
        module_size: 4,
        ecc: QrCodeEcc::Medium,
        ..RenderOptions::default()
    };
    let img = render(&payload, &options).unwrap();
    assert_eq!(decode(&img), payload);
}

#[test]
fn saved_png_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("qr_code_with_frame1.png");
    let written = generate_qr_code(
        Category::LocalPdf,
        "/content/marina-samprovalaki.pdf",
        &out,
        &RenderOptions::default(),
    )
    .unwrap();
    assert_eq!(written, out);

    let img = image::open(&out).unwrap().to_rgb8();
    assert_eq!(decode(&img), "file:///content/marina-samprovalaki.pdf");
}

#[test]
fn zero_border_with_light_frame_round_trips() {
    // Without a border the frame itself has to provide the quiet zone.
    let payload = "https://example.com";
    for module_size in [2, 10] {
        let options = RenderOptions {
            module_size,
            border: 0,
            frame: Some(Frame {
                thickness: 4 * module_size,
                color: Color::WHITE,
            }),
            ..RenderOptions::default()
        };
        let img = render(payload, &options).unwrap();
        assert_eq!(decode(&img), payload, "module size {module_size}");
    }
}

#[test]
fn smallest_readable_module_size_round_trips() {
    let payload = "https://example.com";
    let options = RenderOptions {
        module_size: 2,
        ..RenderOptions::default()
    };
    let img = render(payload, &options).unwrap();
    assert_eq!(img.width(), (25 + 8) * 2 + 40);
    assert_eq!(decode(&img), payload);
}
