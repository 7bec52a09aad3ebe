//! List discovered material groups.

use std::path::PathBuf;

use autoclip_material::discover::discover_library;
use autoclip_render::FfprobeProber;

pub fn run(root: PathBuf) -> anyhow::Result<()> {
    let library = discover_library(&root, &FfprobeProber)?;

    if library.groups.is_empty() {
        println!("No material groups under {}", root.display());
        return Ok(());
    }

    println!("Material groups under {}:", root.display());
    for group in &library.groups {
        let total_secs: f64 = group.clips.iter().map(|c| c.duration_secs).sum();
        println!(
            "  {:<20} {:>3} clips, {:>8.1}s total",
            group.name,
            group.clips.len(),
            total_secs
        );
        for clip in &group.clips {
            println!(
                "    {:<40} {:>7.2}s  {}x{}",
                clip.source_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                clip.duration_secs,
                clip.width,
                clip.height,
            );
        }
    }

    Ok(())
}
