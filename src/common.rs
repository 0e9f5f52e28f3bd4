use log::LevelFilter;
use std::io::Write;

/// Routes `log` records through env_logger. `crate_name` logs at Trace, the
/// OCR engine at Debug, and everything else follows `RUST_LOG`.
pub fn init_logger(crate_name: &str) {
    let target = crate_name.replace('-', "_");

    env_logger::builder()
        .parse_default_env()
        .filter(Some(&target), LevelFilter::Trace)
        .filter(Some("ocr_engine"), LevelFilter::Debug)
        .format(move |f, rec| {
            writeln!(
                f,
                "[{} {} {} {}:{}] {}",
                rec.level(),
                target,
                humantime::format_rfc3339_millis(std::time::SystemTime::now()),
                rec.module_path().unwrap_or("<unknown>"),
                rec.line().unwrap_or(u32::MIN),
                rec.args()
            )
        })
        .init();
}
