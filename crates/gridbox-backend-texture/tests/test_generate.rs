//! Generation tests against the in-memory asset database.
//!
//! These cover the run-level guarantees: one texture and one material per
//! palette color, blend and tiling correctness as seen in the encoded PNGs,
//! deterministic output, and per-entry failure isolation.

use std::path::{Path, PathBuf};

use gridbox_backend_texture::asset::{AssetEvent, InstalledShaders, MemoryAssetDatabase};
use gridbox_backend_texture::png::decode_rgba;
use gridbox_backend_texture::{
    generate_gridbox_set, Color, GenerateError, GridboxLayout, PaletteInput, PixelSource,
    TextureBuffer,
};
use gridbox_spec::{GenerationConfig, GenerationReport, Pipeline};
use pretty_assertions::assert_eq;

// ============================================================================
// Fixtures
// ============================================================================

const RED: Color = Color::rgb(1.0, 0.0, 0.0);
const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

fn palette_of(colors: &[Color]) -> TextureBuffer {
    let mut palette = TextureBuffer::new(colors.len() as u32, 1, Color::black());
    for (x, color) in colors.iter().enumerate() {
        palette.set_texel(x as u32, 0, *color);
    }
    palette
}

fn transparent_overlay() -> TextureBuffer {
    TextureBuffer::new(1, 1, Color::transparent())
}

fn config(size: u32, pipeline: Pipeline) -> GenerationConfig {
    GenerationConfig {
        texture_size: size,
        pipeline,
        ..GenerationConfig::default()
    }
}

fn run(
    palette: &TextureBuffer,
    overlay: &TextureBuffer,
    config: &GenerationConfig,
    assets: &mut MemoryAssetDatabase,
) -> GenerationReport {
    let shaders = InstalledShaders::from_table(&config.shader_table);
    generate_gridbox_set(
        Some(PaletteInput::new("retro", palette)),
        Some(overlay),
        config,
        assets,
        &shaders,
    )
    .expect("generation should succeed")
}

fn png_files(assets: &MemoryAssetDatabase) -> Vec<PathBuf> {
    assets
        .files()
        .filter(|p| p.extension().is_some_and(|e| e == "png"))
        .map(Path::to_path_buf)
        .collect()
}

// ============================================================================
// End-to-end scenario
// ============================================================================

/// Two-color palette, transparent 1x1 overlay, size 4: two solid textures and
/// two materials, each pointing at its own texture.
#[test]
fn test_red_blue_palette_produces_solid_textures_and_materials() {
    let palette = palette_of(&[RED, BLUE]);
    let overlay = transparent_overlay();
    let config = config(4, Pipeline::Urp);
    let mut assets = MemoryAssetDatabase::new();

    let report = run(&palette, &overlay, &config, &mut assets);

    assert!(report.ok);
    assert_eq!(report.color_count, 2);
    assert_eq!(report.textures_written, 2);
    assert_eq!(report.materials_written, 2);

    let layout = GridboxLayout::new(Path::new("Generated Materials"), "retro");
    for (color, hex) in [(RED, "#FF0000"), (BLUE, "#0000FF")] {
        let texture_path = layout.texture_path(hex);
        assert_eq!(
            texture_path,
            Path::new("Generated Materials/retro/Textures").join(format!("{} - retro.png", hex))
        );

        let decoded = decode_rgba(assets.file(&texture_path).unwrap()).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 4));
        assert!(decoded.data.iter().all(|c| c.to_rgba8() == color.to_rgba8()));

        let material = assets.material(&layout.material_path(hex)).unwrap();
        assert_eq!(material.name, format!("{} - retro", hex));
        assert_eq!(material.shader, "Universal Render Pipeline/Lit");
        assert_eq!(
            material.texture("_BaseMap"),
            Some(format!("Generated Materials/retro/Textures/{} - retro.png", hex).as_str())
        );
    }
}

#[test]
fn test_texture_count_matches_palette_width() {
    for width in [1usize, 3, 7] {
        let colors: Vec<Color> = (0..width)
            .map(|i| Color::rgb(i as f64 / width as f64, 0.5, 0.25))
            .collect();
        let palette = palette_of(&colors);
        let mut assets = MemoryAssetDatabase::new();

        let report = run(&palette, &transparent_overlay(), &config(2, Pipeline::Urp), &mut assets);

        assert_eq!(report.textures_written, width);
        assert_eq!(report.materials_written, width);
        assert_eq!(png_files(&assets).len(), width);
        assert_eq!(assets.materials().len(), width);
    }
}

// ============================================================================
// Blend and tiling
// ============================================================================

#[test]
fn test_encoded_texture_tiles_overlay() {
    let mut overlay = TextureBuffer::new(3, 2, Color::transparent());
    overlay.set_texel(0, 0, Color::rgba(1.0, 1.0, 1.0, 1.0));
    overlay.set_texel(2, 1, Color::rgba(0.0, 1.0, 0.0, 1.0));
    overlay.set_texel(1, 1, Color::rgba(0.0, 0.0, 0.0, 0.0));

    let palette = palette_of(&[BLUE]);
    let mut assets = MemoryAssetDatabase::new();
    let report = run(&palette, &overlay, &config(8, Pipeline::Urp), &mut assets);

    let path = PathBuf::from(&report.entries[0].texture_path);
    let decoded = decode_rgba(assets.file(&path).unwrap()).unwrap();

    for y in 0..8 {
        for x in 0..8 {
            let o = overlay.pixel(x % 3, y % 2);
            let expected = BLUE.lerp(&o, o.a).to_rgba8();
            assert_eq!(decoded.pixel(x, y).to_rgba8(), expected, "texel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_half_alpha_overlay_writes_midpoint() {
    let overlay = TextureBuffer::new(1, 1, Color::rgba(0.0, 0.0, 0.0, 0.5));
    let palette = palette_of(&[Color::rgb(1.0, 1.0, 1.0)]);
    let mut assets = MemoryAssetDatabase::new();

    let report = run(&palette, &overlay, &config(2, Pipeline::Urp), &mut assets);

    let decoded = decode_rgba(assets.file(Path::new(&report.entries[0].texture_path)).unwrap()).unwrap();
    // 0.5 -> 127.5 rounds to 128; alpha lerps from 1.0 toward 0.5 by 0.5
    assert!(decoded.data.iter().all(|c| c.to_rgba8() == [128, 128, 128, 191]));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_generation_is_deterministic() {
    let palette = palette_of(&[RED, Color::rgb(0.2, 0.6, 0.4)]);
    let mut overlay = TextureBuffer::new(2, 2, Color::transparent());
    overlay.set_texel(1, 0, Color::rgba(1.0, 1.0, 1.0, 0.75));
    let config = config(16, Pipeline::Urp);

    let mut first = MemoryAssetDatabase::new();
    let mut second = MemoryAssetDatabase::new();
    let report1 = run(&palette, &overlay, &config, &mut first);
    let report2 = run(&palette, &overlay, &config, &mut second);

    assert_eq!(png_files(&first), png_files(&second));
    for path in png_files(&first) {
        assert_eq!(first.file(&path), second.file(&path));
    }
    let hashes1: Vec<_> = report1.entries.iter().map(|e| &e.texture_hash).collect();
    let hashes2: Vec<_> = report2.entries.iter().map(|e| &e.texture_hash).collect();
    assert_eq!(hashes1, hashes2);
}

#[test]
fn test_rerun_overwrites_same_files() {
    let palette = palette_of(&[RED]);
    let overlay = transparent_overlay();
    let config = config(2, Pipeline::Urp);
    let mut assets = MemoryAssetDatabase::new();

    run(&palette, &overlay, &config, &mut assets);
    run(&palette, &overlay, &config, &mut assets);

    assert_eq!(png_files(&assets).len(), 1);
    assert_eq!(assets.materials().len(), 1);
}

// ============================================================================
// Pipelines
// ============================================================================

#[test]
fn test_pipeline_selects_shader_and_slot() {
    let cases = [
        (Pipeline::Legacy, "Standard", "_MainTex"),
        (Pipeline::Urp, "Universal Render Pipeline/Lit", "_BaseMap"),
        (Pipeline::Hdrp, "HDRP/Lit", "_BaseColorMap"),
        (Pipeline::Other("mystery".into()), "Standard", "_MainTex"),
    ];

    for (pipeline, shader, slot) in cases {
        let mut assets = MemoryAssetDatabase::new();
        let report = run(&palette_of(&[RED]), &transparent_overlay(), &config(1, pipeline), &mut assets);

        assert_eq!(report.shader, shader);
        let material = assets.materials().values().next().unwrap();
        assert_eq!(material.shader, shader);
        assert!(material.texture(slot).is_some(), "missing slot {}", slot);
    }
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_missing_palette_aborts_before_any_asset_call() {
    let overlay = transparent_overlay();
    let mut assets = MemoryAssetDatabase::new();
    let shaders = InstalledShaders::from_table(&GenerationConfig::default().shader_table);

    let err = generate_gridbox_set(
        None,
        Some(&overlay),
        &GenerationConfig::default(),
        &mut assets,
        &shaders,
    )
    .unwrap_err();

    match err {
        GenerateError::Precondition(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code.code(), "E001");
        }
        other => panic!("expected precondition failure, got {:?}", other),
    }
    assert!(assets.events().is_empty());
}

#[test]
fn test_missing_overlay_aborts_before_any_asset_call() {
    let palette = palette_of(&[RED]);
    let mut assets = MemoryAssetDatabase::new();
    let shaders = InstalledShaders::default();

    let err = generate_gridbox_set(
        Some(PaletteInput::new("retro", &palette)),
        None::<&TextureBuffer>,
        &GenerationConfig::default(),
        &mut assets,
        &shaders,
    )
    .unwrap_err();

    assert!(matches!(err, GenerateError::Precondition(_)));
    assert!(assets.events().is_empty());
}

#[test]
fn test_invalid_size_aborts_before_any_asset_call() {
    let mut assets = MemoryAssetDatabase::new();
    let err = generate_gridbox_set(
        Some(PaletteInput::new("retro", &palette_of(&[RED]))),
        Some(&transparent_overlay()),
        &config(0, Pipeline::Urp),
        &mut assets,
        &InstalledShaders::default(),
    )
    .unwrap_err();

    assert!(matches!(err, GenerateError::Precondition(_)));
    assert!(assets.events().is_empty());
}

#[test]
fn test_missing_shader_skips_materials_but_writes_textures() {
    let palette = palette_of(&[RED, BLUE]);
    let overlay = transparent_overlay();
    let mut assets = MemoryAssetDatabase::new();
    let shaders = InstalledShaders::new(["Standard"]);

    let report = generate_gridbox_set(
        Some(PaletteInput::new("retro", &palette)),
        Some(&overlay),
        &config(2, Pipeline::Hdrp),
        &mut assets,
        &shaders,
    )
    .unwrap();

    assert!(!report.ok);
    assert_eq!(report.textures_written, 2);
    assert_eq!(report.materials_written, 0);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|e| e.code == "E100"));
    assert!(report.errors[0].message.contains("HDRP/Lit"));
    assert!(report.errors[0].message.contains("hdrp"));
    assert_eq!(png_files(&assets).len(), 2);
    assert!(assets.materials().is_empty());
}

#[test]
fn test_reload_failure_skips_only_that_material() {
    let palette = palette_of(&[RED, BLUE]);
    let overlay = transparent_overlay();
    let config = config(2, Pipeline::Urp);
    let layout = GridboxLayout::new(&config.output_root, "retro");

    let mut assets = MemoryAssetDatabase::new();
    assets.fail_reload(layout.texture_path("#FF0000"));

    let report = run(&palette, &overlay, &config, &mut assets);

    assert_eq!(report.textures_written, 2);
    assert_eq!(report.materials_written, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, "E101");
    assert!(assets.material(&layout.material_path("#FF0000")).is_none());
    assert!(assets.material(&layout.material_path("#0000FF")).is_some());
}

#[test]
fn test_texture_write_failure_continues_with_next_color() {
    let palette = palette_of(&[RED, BLUE]);
    let overlay = transparent_overlay();
    let config = config(2, Pipeline::Urp);
    let layout = GridboxLayout::new(&config.output_root, "retro");

    let mut assets = MemoryAssetDatabase::new();
    assets.fail_write(layout.texture_path("#FF0000"));

    let report = run(&palette, &overlay, &config, &mut assets);

    assert_eq!(report.textures_written, 1);
    assert_eq!(report.materials_written, 1);
    assert_eq!(report.errors[0].code, "E102");
    assert_eq!(report.entries[0].hex, "#0000FF");
    assert_eq!(report.entries[0].index, 1);
}

#[test]
fn test_material_create_failure_is_reported() {
    let palette = palette_of(&[RED]);
    let config = config(2, Pipeline::Urp);
    let layout = GridboxLayout::new(&config.output_root, "retro");

    let mut assets = MemoryAssetDatabase::new();
    assets.fail_write(layout.material_path("#FF0000"));

    let report = run(&palette, &transparent_overlay(), &config, &mut assets);

    assert!(!report.ok);
    assert_eq!(report.textures_written, 1);
    assert_eq!(report.materials_written, 0);
    assert_eq!(report.errors[0].code, "E103");
    assert_eq!(report.entries[0].material_path, None);
}

// ============================================================================
// Asset database protocol
// ============================================================================

#[test]
fn test_folders_created_before_first_write_then_save_and_refresh() {
    let palette = palette_of(&[RED]);
    let mut assets = MemoryAssetDatabase::new();
    run(&palette, &transparent_overlay(), &config(1, Pipeline::Urp), &mut assets);

    let events = assets.events();
    let root = Path::new("Generated Materials/retro");
    assert_eq!(
        &events[..3],
        &[
            AssetEvent::CreateFolder(root.to_path_buf()),
            AssetEvent::CreateFolder(root.join("Textures")),
            AssetEvent::CreateFolder(root.join("Materials")),
        ]
    );
    assert!(matches!(events[3], AssetEvent::WriteFile(_)));
    assert_eq!(&events[events.len() - 2..], &[AssetEvent::Save, AssetEvent::Refresh]);
    assert_eq!(assets.save_count(), 1);
    assert_eq!(assets.refresh_count(), 1);
}

#[test]
fn test_existing_folders_are_not_recreated() {
    let palette = palette_of(&[RED]);
    let config = config(1, Pipeline::Urp);
    let mut assets = MemoryAssetDatabase::new();

    run(&palette, &transparent_overlay(), &config, &mut assets);
    let before = assets
        .events()
        .iter()
        .filter(|e| matches!(e, AssetEvent::CreateFolder(_)))
        .count();
    run(&palette, &transparent_overlay(), &config, &mut assets);
    let after = assets
        .events()
        .iter()
        .filter(|e| matches!(e, AssetEvent::CreateFolder(_)))
        .count();

    assert_eq!(before, 3);
    assert_eq!(after, 3);
}

#[test]
fn test_non_power_of_two_size_is_a_warning() {
    let mut assets = MemoryAssetDatabase::new();
    let report = run(&palette_of(&[RED]), &transparent_overlay(), &config(3, Pipeline::Urp), &mut assets);

    assert!(report.ok);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, "W001");
}
