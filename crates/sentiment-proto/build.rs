//! Compiles `proto/evaluator.proto` into Rust gRPC client/server stubs at
//! build time, the same `tonic-build` toolchain the pack's own OTLP crate
//! uses for its service definitions.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure().build_server(true).build_client(true).compile_protos(
        &["proto/evaluator.proto"],
        &["proto"],
    )?;

    Ok(())
}
