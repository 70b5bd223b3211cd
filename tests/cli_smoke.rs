use std::path::{Path, PathBuf};

use pbrmask::RasterBuffer;

fn write_png(path: &Path, width: u32, height: u32, pixels: &[[u8; 4]]) {
    let mut buffer = RasterBuffer::new(width, height);
    for (i, px) in pixels.iter().enumerate() {
        let (x, y) = (i as u32 % width, i as u32 / width);
        buffer.set_pixel(x, y, u32::from_le_bytes(*px)).unwrap();
    }
    pbrmask::write_image(path, &buffer).unwrap();
}

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_pbrmask")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "pbrmask.exe"
            } else {
                "pbrmask"
            });
            p
        })
}

#[test]
fn cli_mask_then_edit_writes_output_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    let _ = std::fs::remove_dir_all(&dir);

    let layers_dir = dir.join("masks").join("panel");
    std::fs::create_dir_all(&layers_dir).unwrap();
    write_png(
        &layers_dir.join("MASK_hull.png"),
        2,
        2,
        &[[0, 0, 0, 255]; 4],
    );
    write_png(
        &dir.join("in").join("panel.png"),
        2,
        2,
        &[
            [0, 1, 2, 255],
            [64, 1, 2, 255],
            [128, 1, 2, 255],
            [255, 1, 2, 255],
        ],
    );

    let settings_path = dir.join("settings.json");
    let settings = serde_json::json!({
        "InputDirectory": dir.join("in"),
        "OutputDirectory": dir.join("out"),
        "MaskDirectory": dir.join("masks"),
        "Materials": { "hull": { "MetalnessMax": 0.5 } },
        "Input": {
            "panel.png": { "MaskToMaterial": { "MASK_hull": "hull" } }
        }
    });
    let f = std::fs::File::create(&settings_path).unwrap();
    serde_json::to_writer_pretty(f, &settings).unwrap();

    let status = std::process::Command::new(bin_path())
        .arg("mask")
        .arg(&layers_dir)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.join("masks").join("panel.png").exists());
    assert!(dir.join("masks").join("panel.json").exists());

    let status = std::process::Command::new(bin_path())
        .args(["edit", "--settings"])
        .arg(&settings_path)
        .status()
        .unwrap();
    assert!(status.success());

    let out_path = dir.join("out").join("panel.png");
    assert!(out_path.exists());
    let output = pbrmask::read_image(&out_path).unwrap();
    let expected = [0u8, 64, 127, 127];
    for (i, expected) in expected.into_iter().enumerate() {
        let (x, y) = (i as u32 % 2, i as u32 / 2);
        assert_eq!(output.pixel(x, y).unwrap().to_le_bytes()[0], expected);
    }
}
