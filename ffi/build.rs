use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out = PathBuf::from(&crate_dir).join("include").join("netkit.h");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("NETKIT_H")
        .generate()
    {
        Ok(bindings) => {
            if let Some(dir) = out.parent() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    println!("cargo:warning=could not create {}: {e}", dir.display());
                    return;
                }
            }
            // The returned bool only says whether the contents changed.
            bindings.write_to_file(&out);
            if !out.is_file() {
                println!("cargo:warning=cbindgen did not write {}", out.display());
            }
        }
        Err(e) => println!("cargo:warning=cbindgen could not generate {}: {e}", out.display()),
    }
}
