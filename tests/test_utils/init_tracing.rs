static TRACING: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
	let _ = tracing_subscriber::fmt()
		.with_env_filter( tracing_subscriber::EnvFilter::from_default_env() )
		.with_test_writer()
		.try_init();
});

/// Installs a test subscriber once per test binary. Filter with `RUST_LOG`.
#[allow( dead_code )]
pub fn init_tracing() { once_cell::sync::Lazy::force( &TRACING ); }
