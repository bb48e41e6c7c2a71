fn main() {
    if let Err(e) = dicom_bucket_audit::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
