use std::process::Command;

fn main() {
    for (var, exported) in [
        ("TARGET", "CSVWIRE_BUILD_TARGET"),
        ("PROFILE", "CSVWIRE_BUILD_PROFILE"),
    ] {
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={exported}={value}");
        }
        println!("cargo:rerun-if-env-changed={var}");
    }

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Ok(output) = Command::new(rustc).arg("--version").output() {
        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            println!("cargo:rustc-env=CSVWIRE_RUSTC_VERSION={}", version.trim());
        }
    }
}
