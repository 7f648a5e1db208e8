// Copies static site assets to `dist/`. The wasm package itself is built by
// `viz serve` (or wasm-pack directly) into `static/pkg`.
use std::path::Path;

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        if let Err(err) = fs_extra::dir::remove(out_dir) {
            println!("cargo:warning=could not clear dist/: {err}");
            return;
        }
    }
    if let Err(err) = std::fs::create_dir_all(out_dir) {
        println!("cargo:warning=could not create dist/: {err}");
        return;
    }

    let options = CopyOptions::new().content_only(true).overwrite(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=static asset copy failed: {err}");
    }
}
