use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let out_dir = PathBuf::from(&crate_dir).join("include");

    // Ensure include directory exists
    std::fs::create_dir_all(&out_dir).ok();

    let config = cbindgen::Config::from_file("cbindgen.toml").unwrap_or_default();

    // Header generation is best-effort; the Rust library builds without it.
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("vpnlist.h"));
        }
        Err(e) => println!("cargo:warning=Unable to generate C bindings: {}", e),
    }
}
