use std::process::exit;

use cashflow_rs::pin_digest;

/// A utility for computing the `X-Auth` bearer token for a PIN.
///
/// Useful for driving the API with curl without going through `/api/login`,
/// and for sanity-checking a `CASHFLOW_PINS` entry.
fn main() {
    let pin = match rpassword::prompt_password("PIN: ") {
        Ok(pin) => pin,
        Err(error) => {
            eprintln!("Could not read PIN: {error}");
            exit(1);
        }
    };

    let pin = pin.trim();
    if pin.is_empty() {
        eprintln!("PIN must not be empty.");
        exit(1);
    }

    println!("{}", pin_digest(pin));
}
