// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use toneline::audio::output::{default_device_name, list_devices};
use toneline::{PlaybackEngine, SettingsFile, SynthBackend, Waveform};

fn print_usage() {
    println!("TONELINE - Multi-Track Tone Sequencer Engine");
    println!();
    println!("Usage: toneline [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-audio            List available audio output devices");
    println!("  --demo [SECONDS]        Play a demo timeline (default: to the timeline end)");
    println!("  --settings <FILE>       Load settings from a YAML file (with --demo)");
    println!("  --help                  Show this help message");
}

fn list_audio() {
    let devices = list_devices();
    if devices.is_empty() {
        println!("No audio output devices found");
        return;
    }

    println!("Audio output devices:");
    for (i, name) in devices.iter().enumerate() {
        let marker = if Some(name) == default_device_name().as_ref() {
            " (default)"
        } else {
            ""
        };
        println!("  {}: {}{}", i, name, marker);
    }
}

/// Build an engine with a small two-track session: a lead melody line
/// and an overlapping pad chord.
fn demo_engine(settings: &SettingsFile) -> PlaybackEngine {
    let mut engine = match SynthBackend::new(
        settings.audio.to_audio_config(),
        settings.audio.master_gain,
    ) {
        Ok(backend) => PlaybackEngine::new(settings.engine.timeline_duration, Box::new(backend)),
        Err(e) => {
            eprintln!("Audio unavailable ({}), running silent", e);
            PlaybackEngine::without_audio(settings.engine.timeline_duration)
        }
    };

    let lead = engine.add_track("Lead", 440.0, Waveform::Sine);
    let pad = engine.add_track("Pad", 220.0, Waveform::Triangle);

    // Lead: a short rising line
    let a = engine.add_block(lead, 0.0).unwrap();
    engine.set_frequency(a, 440.0);
    let b = engine.add_block(lead, 1.0).unwrap();
    engine.set_frequency(b, 494.0);
    let c = engine.add_block(lead, 2.0).unwrap();
    engine.set_frequency(c, 523.0);

    // Pad: two overlapping blocks form a chord
    let root = engine.add_block(pad, 0.5).unwrap();
    engine.resize_block(root, 3.0);
    let fifth = engine.add_block(pad, 0.5).unwrap();
    engine.resize_block(fifth, 3.0);
    engine.set_frequency(fifth, 330.0);

    engine
}

fn run_demo(settings: &SettingsFile, seconds: Option<f64>) -> Result<()> {
    let mut engine = demo_engine(settings);

    let frame = Duration::from_secs_f64(1.0 / settings.engine.tick_rate_hz as f64);
    let limit = seconds.unwrap_or(settings.engine.timeline_duration);

    println!(
        "Playing demo timeline ({} tracks, {} blocks, {:.0}s limit)...",
        engine.tracks().len(),
        engine.blocks().len(),
        limit
    );

    engine.play();

    let mut last_second = u64::MAX;
    while engine.is_playing() && engine.current_time() < limit {
        engine.tick();

        let second = engine.current_time() as u64;
        if second != last_second {
            last_second = second;
            println!(
                "  t={:>3}s  active={}",
                second,
                engine.active_block_ids().len()
            );
        }

        thread::sleep(frame);
    }

    engine.stop();
    println!("Demo complete!");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("TONELINE - Multi-Track Tone Sequencer Engine");
        println!("Run with --help for usage information");
        return Ok(());
    }

    // --settings may accompany --demo in either order
    let settings = match args.iter().position(|a| a == "--settings") {
        Some(i) => {
            let path = args.get(i + 1).ok_or_else(|| {
                anyhow::anyhow!("--settings requires a file path")
            })?;
            let settings = SettingsFile::load(path)?;
            settings.validate()?;
            settings
        }
        None => SettingsFile::default(),
    };

    match args[1].as_str() {
        "--list-audio" => {
            list_audio();
        }
        "--demo" => {
            let seconds = args.get(2).and_then(|s| s.parse::<f64>().ok());
            run_demo(&settings, seconds)?;
        }
        "--settings" => {
            // Settings alone: validate and show
            println!("{}", settings.to_yaml()?);
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
