/// The xtask binary delegates entirely to nih_plug_xtask, which provides
/// the `bundle` subcommand. Usage:
///
///   cargo xtask bundle loveless-reverb-chorus --release
///
/// This compiles the library as a cdylib and packages both plugins into
/// `target/bundled/loveless-reverb-chorus.{vst3,clap}`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
