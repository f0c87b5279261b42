//! CLI integration tests
//!
//! These tests run the breed-render binary inside a temporary directory and
//! check exit codes, messages and the written images.

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use common::*;

/// A temp dir holding `norn.gen` and `sprites/norn.pray`.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("should create temp dir");
        fs::write(dir.path().join("norn.gen"), norn_genome()).unwrap();
        fs::create_dir_all(dir.path().join("sprites")).unwrap();
        fs::write(dir.path().join("sprites/norn.pray"), norn_sprites()).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Run the binary with the workspace as working directory and no user config.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_breed-render"))
            .args(args)
            .current_dir(self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("xdg"))
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute breed-render")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).expect("Failed to open output image");
    (img.width(), img.height())
}

#[test]
fn test_render_single_variant() {
    let ws = Workspace::new();
    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "--age", "adult", "-g", "m", "sprites"]);

    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Saved:"));

    let img = image::open(ws.path("norn.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 4));
    assert_eq!(img.get_pixel(0, 0)[3], 0, "unpainted pixels are transparent");
    let [r, g, b] = warm(HEAD_INDEX);
    assert_eq!(img.get_pixel(1, 0).0, [r, g, b, 255]);
}

#[test]
fn test_render_scale_trim_padding() {
    let ws = Workspace::new();
    let output = ws.run(&[
        "render", "out.png", "--genome", "norn.gen", "--age", "4", "--sex", "male", "--hidden", "BODY", "--trim", "-s",
        "3", "-d", "1", "sprites",
    ]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    // 2x2 head, scaled to 6x6, one pixel of padding on each side
    assert_eq!(dimensions(&ws.path("out.png")), (8, 8));
}

#[test]
fn test_render_multiple_variants_numbered() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path("renders")).unwrap();
    let output = ws.run(&[
        "render", "renders", "--genome", "norn.gen", "--variant", "adult:m", "--variant", "child:f", "sprites",
    ]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert_eq!(dimensions(&ws.path("renders/render.0.png")), (2, 4));
    assert_eq!(dimensions(&ws.path("renders/render.1.png")), (1, 1));
}

#[test]
fn test_render_increment_skips_existing() {
    let ws = Workspace::new();
    fs::write(ws.path("norn.0.png"), b"").unwrap();
    let output = ws.run(&["render", "norn.png", "--genome", "norn.gen", "-a", "1", "-g", "f", "-i", "sprites"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(ws.path("norn.1.png").exists());
    assert!(!ws.path("norn.png").exists());
}

#[test]
fn test_render_age_fallback_warns() {
    let ws = Workspace::new();
    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "--age", "adult", "--sex", "f", "sprites"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(stderr(&output).contains("Warning:"));
    assert_eq!(dimensions(&ws.path("norn.png")), (1, 1));

    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "--age", "adult", "--sex", "f", "-x", "sprites"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error:"));
}

#[test]
fn test_render_missing_sheet_strict() {
    let ws = Workspace::new();
    let partial = ws.path("partial.pray");
    let container = breedrender::container::ContainerWriter::new()
        .block("SPRT", "a04a", sheet(2, 2, vec![0, HEAD_INDEX, HEAD_INDEX, 0]))
        .finish()
        .unwrap();
    fs::write(&partial, container).unwrap();

    let output = ws.run(&["render", "lenient", "--genome", "norn.gen", "-a", "adult", "-g", "m", "partial.pray"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(stderr(&output).contains("skipped slot 'BODY'"));
    assert!(ws.path("lenient.png").exists());

    let output =
        ws.run(&["render", "strict", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--strict", "partial.pray"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!ws.path("strict.png").exists());
}

#[test]
fn test_render_egg_without_sources() {
    let ws = Workspace::new();
    fs::write(ws.path("norn.egg"), norn_egg()).unwrap();
    let output = ws.run(&["render", "egg", "--genome", "norn.egg", "-a", "adult", "-g", "m"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert_eq!(dimensions(&ws.path("egg.png")), (2, 4));
}

#[test]
fn test_render_part_from_other_genome() {
    let ws = Workspace::new();
    let donor = breedrender::genome::GenomeWriter::new()
        .appearance(
            breedrender::models::AgeStage::Adult,
            breedrender::models::Sex::Male,
            "HEAD",
            target("c04a", 1, 0, 1),
        )
        .encode();
    fs::write(ws.path("donor.gen"), donor).unwrap();

    let output = ws.run(&[
        "render", "mixed", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--part", "HEAD=donor.gen", "sprites",
    ]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    let img = image::open(ws.path("mixed.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 4));
    let [r, g, b] = warm(CHILD_INDEX);
    assert_eq!(img.get_pixel(1, 0).0, [r, g, b, 255]);
    assert_eq!(img.get_pixel(0, 0)[3], 0);

    let output = ws.run(&[
        "render", "same", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--part", "TAIL=donor.gen", "sprites",
    ]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(stderr(&output).contains("no 'TAIL' part"));

    let output = ws.run(&["render", "x", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--part", "HEAD=nope.gen"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot open genome 'nope.gen'"));
}

#[test]
fn test_render_random_and_partial_colors() {
    let ws = Workspace::new();
    let output = ws.run(&[
        "render", "random", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--tint", "rand", "--swap", "?",
        "--rotation", "-1", "sprites",
    ]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert_eq!(dimensions(&ws.path("random.png")), (2, 4));

    // Blank channels keep the genome's neutral value
    let output = ws.run(&["render", "partial", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--tint", ":128:", "sprites"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    let img = image::open(ws.path("partial.png")).unwrap().to_rgba8();
    let [r, g, b] = warm(HEAD_INDEX);
    assert_eq!(img.get_pixel(1, 0).0, [r, g, b, 255]);

    let output = ws.run(&["render", "bad", "--genome", "norn.gen", "-a", "adult", "-g", "m", "--swap", "300", "sprites"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_render_config_file_supplies_sources_and_scale() {
    let ws = Workspace::new();
    fs::write(ws.path("breedrender.toml"), "[render]\nscale = 2\n\n[sources]\npaths = [\"sprites\"]\n").unwrap();
    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "-a", "adult", "-g", "m"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert_eq!(dimensions(&ws.path("norn.png")), (4, 8));

    // CLI flags override the config file
    let output = ws.run(&["render", "small", "--genome", "norn.gen", "-a", "adult", "-g", "m", "-s", "1"]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert_eq!(dimensions(&ws.path("small.png")), (2, 4));
}

#[test]
fn test_render_invalid_config_fails() {
    let ws = Workspace::new();
    fs::write(ws.path("breedrender.toml"), "[render]\nscale = 50\n").unwrap();
    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "-a", "adult", "-g", "m", "sprites"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("render.scale"));
}

#[test]
fn test_render_invalid_arguments() {
    let ws = Workspace::new();

    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "sprites"]);
    assert_eq!(output.status.code(), Some(2), "no variant: {}", stderr(&output));

    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "--age", "9", "--sex", "m", "sprites"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("0..6"));

    let output = ws.run(&["render", "norn", "--genome", "norn.gen", "-a", "1", "-g", "f", "--scale", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_render_missing_genome() {
    let ws = Workspace::new();
    let output = ws.run(&["render", "norn", "--genome", "nope.gen", "-a", "1", "-g", "f", "sprites"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot open genome"));
}

#[test]
fn test_inspect_container_json() {
    let ws = Workspace::new();
    let output = ws.run(&["inspect-container", "sprites/norn.pray", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let blocks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = blocks.as_array().unwrap().iter().map(|b| b["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["a04a", "b04a", "c04a"]);
    assert_eq!(blocks[1]["compressed"], serde_json::Value::Bool(true));
}

#[test]
fn test_inspect_sheet_from_block() {
    let ws = Workspace::new();
    let output = ws.run(&["inspect-sheet", "sprites/norn.pray", "--block", "b04a"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("palette: embedded"));
    assert!(stdout.contains("2x2"));

    let output = ws.run(&["inspect-sheet", "sprites/norn.pray", "--block", "zzzz"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_inspect_genome() {
    let ws = Workspace::new();
    let output = ws.run(&["inspect-genome", "norn.gen"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("adult male, child female"));
    assert!(stdout.contains("HEAD <- a04a[0]"));
}

#[test]
fn test_palettes_list() {
    let ws = Workspace::new();
    let output = ws.run(&["palettes", "list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("@default"));
    assert!(stdout.contains("@grayscale"));

    let output = ws.run(&["palettes", "show", "@sepia"]);
    assert_eq!(output.status.code(), Some(1));
}
