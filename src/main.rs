//! Matching Games - Demo Binary
//!
//! Solves the classic hospital/resident instance both ways and prints the
//! matchings. Set `RUST_LOG=matching-games=debug` to watch the engines.

use matching_games::{HospitalResident, MultipleMatching, Optimal};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("===========================================");
    println!("  Matching Games - Hospital/Resident");
    println!("===========================================");
    println!();

    let residents = [
        ("A", vec!["C"]),
        ("S", vec!["C", "M"]),
        ("D", vec!["C", "M", "G"]),
        ("J", vec!["C", "G", "M"]),
        ("L", vec!["M", "C", "G"]),
    ];
    let hospitals = [
        ("M", vec!["D", "L", "S", "J"]),
        ("C", vec!["D", "A", "S", "L", "J"]),
        ("G", vec!["D", "J", "L"]),
    ];
    let capacities = [("M", 2), ("C", 2), ("G", 2)];

    let built = HospitalResident::create_from_dictionaries(residents, hospitals, capacities, false);
    let mut game = match built {
        Ok(game) => game,
        Err(e) => {
            eprintln!("ERROR: failed to build game: {e}");
            std::process::exit(1);
        }
    };

    for optimal in [Optimal::Resident, Optimal::Hospital] {
        match game.solve(optimal) {
            Ok(matching) => {
                println!("{}-optimal matching:", optimal.as_str());
                print_matching(&matching);
                println!("  Stable: {}", game.check_stability());
                println!("  Valid:  {}", game.check_validity().is_ok());
                println!("  Digest: {}", matching.digest_hex());
                println!();
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn print_matching(matching: &MultipleMatching) {
    for (hospital, residents) in matching.iter() {
        println!("  {hospital:<4} -> [{}]", residents.join(", "));
    }
}
