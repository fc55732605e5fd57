// Copyright (c) 2026 ADNT Sarl <info@adnt.io>
// SPDX-License-Identifier: MIT

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let linker_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap())
        .parent()
        .unwrap()
        .join("linker_scripts");

    let memory = fs::read_to_string(linker_dir.join("supervisor.x"))
        .expect("Failed to read supervisor.x");
    fs::write(out_dir.join("memory.x"), memory).expect("Failed to write memory.x");

    let device =
        fs::read_to_string(linker_dir.join("device.x")).expect("Failed to read device.x");
    fs::write(out_dir.join("device.x"), device).expect("Failed to write device.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg=-Tlink.x");
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!(
        "cargo:rerun-if-changed={}",
        linker_dir.join("supervisor.x").display()
    );
    println!(
        "cargo:rerun-if-changed={}",
        linker_dir.join("device.x").display()
    );
    println!("cargo:rerun-if-changed=build.rs");
}
