/// Skip a test if Secret Manager credentials are not configured.
#[macro_export]
macro_rules! skip_without_gcp {
    () => {
        if std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN").is_err()
            && std::process::Command::new("gcloud")
                .args(["auth", "print-access-token"])
                .output()
                .map(|o| !o.status.success())
                .unwrap_or(true)
        {
            eprintln!("SKIPPED: gcloud not authenticated");
            return;
        }
        if std::env::var("MKSECRET_TEST_GCP_PROJECT").is_err() {
            eprintln!("SKIPPED: MKSECRET_TEST_GCP_PROJECT not set (set to a GCP project ID)");
            return;
        }
    };
}
