use bandlogos::error::BandLogosError;

fn main() {
    if let Err(err) = bandlogos::run() {
        // The report has already been printed for a failed validation.
        if !matches!(err, BandLogosError::ValidationError(_)) {
            eprintln!("Error: {}", err);
        }
        std::process::exit(err.exit_code());
    }
}
