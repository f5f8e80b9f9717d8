//! Host platform quirks

/// Value of `JAVA_OPTIONS` the JVM-based images need on this host, if any
///
/// The JVM in the Microcks images crashes on Apple Silicon unless SVE
/// support is disabled.
pub fn java_options() -> Option<&'static str> {
    java_options_for(std::env::consts::OS, std::env::consts::ARCH)
}

fn java_options_for(os: &str, arch: &str) -> Option<&'static str> {
    match (os, arch) {
        ("macos", "aarch64") => Some("-XX:UseSVE=0"),
        _ => None,
    }
}
