// build.rs

fn main() {
    // --- Link against Xlib ---
    // pkg-config is the standard way to find the linker flags. If it is not
    // installed or x11.pc is missing, fall back to the conventional names.
    match pkg_config::probe_library("x11") {
        Ok(_) => {
            eprintln!("pkg-config found x11. Linking configured automatically.");
        }
        Err(e) => {
            eprintln!(
                "pkg-config failed for library 'x11' ({}). Falling back to manual linking.",
                e
            );
            println!("cargo:rustc-link-lib=X11");
            println!("cargo:rustc-link-search=/usr/lib");
            eprintln!("Manual linking flags applied. Ensure the Xlib development package is installed.");
        }
    }
}
