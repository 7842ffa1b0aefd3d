//! Builds a few expressions over fixed, dynamic and external containers and prints the results.
//!
//! Run with `RUST_LOG=cml=trace` to see resizes and size mismatches logged by the library.

use anyhow::Context;
use cml::*;
use log::LevelFilter;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter(Some("cml"), LevelFilter::Debug)
        .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .ok();

    let a = vec3(1.0f32, 2.0, 3.0);
    let b = vec3(0.5f32, -1.0, 2.0);
    let sum = (&a + &b * 2.0).eval();
    log::info!("a + 2b = {sum}");
    log::info!("a . b = {}, a x b = {}", dot(&a, &b), cross(&a, &b).eval());

    // Mixed element types promote: i32 * f64 is computed as f64.
    let m = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
    let mv = (&m * vec3(0.5, 0.5, 0.5)).eval();
    log::info!("m * (0.5, 0.5, 0.5) = {mv}");
    log::info!("m * m^T = {:?}", (&m * transpose(&m)).eval());

    let mut dynamic = DynVector::<f64>::zeros(2);
    let wrong = DynVector::from_vec(vec![1.0, 2.0, 3.0]);
    match dynamic.try_assign(&wrong) {
        Ok(()) => log::info!("resized to {} elements", dynamic.size()),
        Err(e) => log::warn!("assignment rejected: {e}"),
    }
    dynamic.assign_resizing(&wrong);
    log::info!("after assign_resizing: {dynamic:?}");

    let mut buf = [0i32; 4];
    {
        let mut ext = ExternalMatrix::new(&mut buf, 2, 2).context("binding external matrix")?;
        ext.assign(&Mat2::<i32>::identity() * 3);
        ext.set_row(1, [7, 8]);
    }
    log::info!("external buffer: {buf:?}");

    let mut cols = [0.0f64; 6];
    {
        let mut ext = ExternalMatrix::new_col_major(&mut cols, 2, 3)
            .context("binding column-major matrix")?;
        ext.set_basis_element(Basis::Col, 2, 0, 1.0);
        ext.set_basis_element(Basis::Row, 1, 1, 2.0);
        log::info!("column-major matrix: {ext:?}");
    }
    log::info!("column-major buffer: {cols:?}");
    let d = DynMatrix::from_rows([[1, 2], [3, 4]]);
    log::info!("trace of {d:?}: {}", d.trace().context("trace of square matrix")?);

    let i = Quat::<f64>::from_wxyz(0.0, 1.0, 0.0, 0.0);
    let j = Quat::<f64>::from_wxyz(0.0, 0.0, 1.0, 0.0);
    let k = (&i * &j).eval();
    log::info!("i * j = {k:?}, conjugate = {:?}", conjugate(&k).eval());

    Ok(())
}
