fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF environment export is only needed for the firmware build; host
    // builds and tests run without the IDF toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
