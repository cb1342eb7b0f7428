//! gridscore CLI: replay a gesture script and print the result.
//!
//! Usage:
//!   gs-cli score.txt
//!   gs-cli score.txt --length 64 --bpm 90 --scroll 8 --play
//!
//! Set RUST_LOG=debug to trace gestures and playback.

use std::io::Write;
use std::path::Path;
use std::time::Duration;
use std::{env, process};

use gridscore::report;
use gridscore::script::{self, Session};
use gs_master::{Controller, LoggedCall, NUM_VOICES};
use tracing_subscriber::EnvFilter;

const DEFAULT_LENGTH: usize = 48;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct Args {
    script: String,
    length: usize,
    bpm: Option<f64>,
    scroll: Option<f64>,
    play: bool,
}

fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let i = args.iter().position(|a| a == flag)?;
    let value = args.get(i + 1)?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("Invalid value for {}: {}", flag, value);
            process::exit(1);
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let script = args.get(1).filter(|a| !a.starts_with("--")).cloned().unwrap_or_else(|| {
        eprintln!("Usage: gs-cli <script> [--length N] [--bpm BPM] [--scroll COLUMN] [--play]");
        process::exit(1);
    });
    Args {
        script,
        length: flag_value(&args, "--length").unwrap_or(DEFAULT_LENGTH),
        bpm: flag_value(&args, "--bpm"),
        scroll: flag_value(&args, "--scroll"),
        play: args.iter().any(|a| a == "--play"),
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args();

    let lines = script::load(Path::new(&args.script)).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });

    let mut session = Session::new(Controller::new(args.length)).unwrap_or_else(|e| {
        eprintln!("Failed to set up instruments: {}", e);
        process::exit(1);
    });
    if let Some(bpm) = args.bpm {
        if let Err(e) = session.controller.editor_mut().set_bpm(bpm) {
            eprintln!("Invalid value for --bpm: {}", e);
            process::exit(1);
        }
    }
    if let Err(e) = session.run(&lines) {
        eprintln!("{}", e);
        process::exit(1);
    }
    if let Some(column) = args.scroll {
        session.controller.scroll_to_column(column);
    }

    print_score(&session);

    let schedule = session.controller.render_schedule();
    println!("Schedule:");
    print!("{}", report::schedule_table(&schedule));

    if args.play {
        play(&mut session);
    }
}

fn print_score(session: &Session<gs_master::SystemTransport>) {
    let editor = session.controller.editor();
    let score = editor.score();
    println!("Length: {} columns", score.len());
    println!("Tempo:  {} BPM", score.bpm);
    println!();

    for voice in 0..NUM_VOICES {
        let grid = report::voice_grid(score, voice);
        if grid.is_empty() {
            continue;
        }
        let instrument = session.instruments[voice].map_or("(unassigned)".to_string(), |k| k.to_string());
        println!("Voice {} {}", voice, instrument);
        print!("{}", grid);
        for (range, command) in report::hairpins(editor, voice) {
            println!("    {:?} {}..={}", command, range.start(), range.end());
        }
        if let Some(longest) = report::longest_hairpin(editor, voice) {
            println!("    longest hairpin spans {} columns", longest.len());
        }
        println!();
    }
}

fn play(session: &mut Session<gs_master::SystemTransport>) {
    let started = session.controller.play();
    println!();
    println!("Playing {:.2}s from column {:.1}...", started.play_duration, started.start_column);

    let controller = &mut session.controller;
    let mut frames = 0;
    while controller.pump() {
        frames += 1;
        print!("\rt = {:>6.2}s  scroll = {:>7.1}px", controller.position(), controller.view_scroll());
        let _ = std::io::stdout().flush();
        std::thread::sleep(FRAME_INTERVAL);
    }

    let triggered = session
        .log
        .borrow()
        .iter()
        .filter(|call| !matches!(call, LoggedCall::StopAll { .. }))
        .count();
    println!("\rDone after {} frames, {} triggers.          ", frames, triggered);
}
