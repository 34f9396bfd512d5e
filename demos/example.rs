use dragon_env::{EnvSet, LogLevel, OrFallback};

fn main() -> Result<(), dragon_env::EnvError> {
    let mut env = EnvSet::new();
    env.load_file()?;

    let level = env.apply_log_level(LogLevel::Info);

    let (host, _) = env.string("DB_HOST", "localhost");
    let port = env.int("DB_PORT", 5432).or_fallback();
    let debug = env.default_bool(false)("DEBUG");

    println!("Log level: {level}");
    println!("Database: {host}:{port} (debug={debug})");

    // Scoped changes stay in the clone
    let mut scoped = env.clone();
    scoped.set(false, "DB_HOST", "replica.internal")?;
    println!("Replica: {}", scoped.string("DB_HOST", "").0);
    println!("Primary: {}", env.string("DB_HOST", "").0);

    Ok(())
}
