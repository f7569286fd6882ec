fn main() {
    // Only embed the Windows icon when building for a Windows target on a Windows host
    #[cfg(target_os = "windows")]
    {
        let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
        if target_os == "windows" {
            let mut res = winres::WindowsResource::new();
            res.set_icon("resources/icon.ico");
            if let Err(e) = res.compile() {
                eprintln!("Warning: Failed to embed icon in executable: {}", e);
                eprintln!("The front-end will still work, but the .exe will use the default icon.");
            } else {
                println!("cargo:warning=Embedded icon.ico in Windows executable");
            }
        }
    }
}
