fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_dir = "proto";

    for proto in ["company.proto", "product.proto"] {
        println!("cargo:rerun-if-changed={}/{}", proto_dir, proto);
    }

    let result = tonic_build::configure().compile_protos(
        &[
            format!("{proto_dir}/company.proto"),
            format!("{proto_dir}/product.proto"),
        ],
        &[proto_dir],
    );

    // Environments without protoc fall back to the vendored codegen output,
    // which is committed under proto/generated/.
    if result.is_err() {
        let out_dir = std::env::var("OUT_DIR")?;
        for generated in ["company.v1.rs", "product.v1.rs"] {
            println!("cargo:rerun-if-changed={proto_dir}/generated/{generated}");
            std::fs::copy(
                format!("{proto_dir}/generated/{generated}"),
                format!("{out_dir}/{generated}"),
            )?;
        }
    }

    Ok(())
}
