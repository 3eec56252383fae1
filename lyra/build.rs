fn main() {
    println!("cargo:rerun-if-changed=shim/lyra_shim.cc");
    println!("cargo:rerun-if-env-changed=LYRA_DIR");

    // Without the native feature the crate only exposes the engine traits.
    if std::env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    let lyra_dir = std::env::var("LYRA_DIR").unwrap_or_else(|_| "/opt/lyra".to_string());

    cc::Build::new()
        .cpp(true)
        .file("shim/lyra_shim.cc")
        .include(&lyra_dir)
        .include(format!("{lyra_dir}/include"))
        .flag_if_supported("-std=c++17")
        .compile("lyra_shim");

    println!("cargo:rustc-link-search=native={lyra_dir}/lib");
    println!("cargo:rustc-link-lib=lyra");
}
