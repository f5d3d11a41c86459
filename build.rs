fn main() {
    println!("cargo:rerun-if-changed=sdkconfig.defaults");

    // ESP-IDF link/env propagation is only needed for on-target builds;
    // host builds (tests, simulation) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
