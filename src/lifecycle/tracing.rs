//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the structured
//! fields carry the context instead.
//!
//! ## What Gets Traced
//!
//! - **Actors**: start, shutdown and resets, labelled `{account}/{region}`
//! - **Operations**: every invocation at `debug`, every rejection at `warn` with its error code
//! - **State changes**: each create/delete at `info` with the resource `kind`, `id` and registry `size`
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # Full request payloads
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a directory creation reads:
//!
//! ```text
//! INFO Created kind="vpc" id=vpc-0a1b2c3d4e5f60718 size=1
//! INFO Created kind="subnet" id=subnet-9f8e7d6c5b4a39281 size=1
//! INFO Created kind="subnet" id=subnet-1a2b3c4d5e6f70819 size=2
//! INFO Created kind="directory" id=d-12ab34cd56 size=1
//! WARN Invoke failed scope=123456789012/us-east-1 service=ds operation=CreateDirectory code=ClientException error=...
//! ```
//!
//! Passwords are never logged: directory operations log names and sizes, not inputs.

/// Installs the global subscriber. Later calls are no-ops, so tests may call it freely.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
