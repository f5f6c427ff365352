fn main() {
    // Host builds (unit tests) must not see the firmware linker scripts.
    if std::env::var_os("CARGO_FEATURE_ESP32C3").is_none() {
        return;
    }

    linker_be_nice();
    // make sure linkall.x is the last linker script (otherwise might cause problems with flip-link)
    println!("cargo:rustc-link-arg-bins=-Tlinkall.x");
}

fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        let kind = &args[1];
        let what = &args[2];

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                _ => (),
            },
            // we don't have anything helpful for "missing-lib" yet
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg-bins=-Wl,--error-handling-script={}",
            exe.display()
        );
    }
}
