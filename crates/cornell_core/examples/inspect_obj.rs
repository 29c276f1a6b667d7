//! Example: Load and inspect an OBJ file the way the renderer sees it.
//!
//! Run with: cargo run --example inspect_obj -- scenes/blocks.obj

use std::env;

use cornell_core::load_obj;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_obj <path-to-obj-file>");
        println!("\nExample:");
        println!("  cargo run --example inspect_obj -- scenes/blocks.obj");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match load_obj(path) {
        Ok(meshes) => {
            println!("\n--- Groups ---");
            for mesh in &meshes {
                let usable = mesh.triangles().len();
                println!(
                    "  {} - {} vertices, {} triangles ({} usable)",
                    mesh.name,
                    mesh.vertex_count(),
                    mesh.triangle_count(),
                    usable
                );
            }
        }
        Err(e) => {
            eprintln!("Error loading OBJ: {}", e);
            std::process::exit(1);
        }
    }
}
