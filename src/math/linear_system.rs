use crate::error::{Result, SolverError};

/// Solves `n` linear equations in `n` unknowns.
///
/// Each equation holds `n + 1` values, the last being the right-hand side, so
/// `2x + y = 5` is `[2.0, 1.0, 5.0]`. Elimination always removes the second
/// coefficient column by combining adjacent equations, which keeps the first
/// variable in every reduced equation until only `a·x0 = rhs` is left; the
/// reduction is then unwound from the stack of pivot equations. The solution
/// is returned in variable order.
///
/// # Errors
///
/// Returns [`SolverError::MalformedSystem`] if the system is empty, an equation
/// has fewer than 2 values, equations differ in length, or the number of
/// equations does not match the number of unknowns.
/// Returns [`SolverError::SingularSystem`] if no usable pivot exists at some
/// elimination stage or the solution is not finite.
pub fn solve<E: AsRef<[f64]>>(eqs: &[E]) -> Result<Vec<f64>> {
    let width = validate_shape(eqs)?;

    let mut stage: Vec<Vec<f64>> = eqs.iter().map(|eq| eq.as_ref().to_vec()).collect();
    let mut pivots: Vec<Vec<f64>> = Vec::with_capacity(width - 1);

    while stage[0].len() > 2 {
        let pivot = pick_valid_equation(&stage)
            .ok_or(SolverError::SingularSystem)?
            .clone();
        stage = reduce_stage(&stage);
        pivots.push(pivot);
    }

    let last = &stage[0];
    if !has_first_coefficient(last) {
        return Err(SolverError::SingularSystem.into());
    }
    let mut solution = Vec::with_capacity(width - 1);
    solution.push(last[1] / last[0]);

    // Pivot k holds [x0, x(k+1), x(k+2), .., rhs]; the newly solved variable
    // therefore always lands right after x0.
    while let Some(eq) = pivots.pop() {
        let mut known = eq[0] * solution[0];
        for (k, value) in solution.iter().enumerate().skip(1) {
            known += value * eq[k + 1];
        }
        let rhs = eq[eq.len() - 1];
        solution.insert(1, (rhs - known) / eq[1]);
    }

    if solution.iter().all(|v| v.is_finite()) {
        Ok(solution)
    } else {
        Err(SolverError::SingularSystem.into())
    }
}

/// Solves a system of 3 equations in 3 unknowns.
///
/// Hand-unrolled on fixed-size arrays for the per-cell affine hot path. The
/// elimination order, pivot choice and summation order are those of [`solve`],
/// so both return identical bits for the same input.
///
/// # Errors
///
/// Returns [`SolverError::SingularSystem`] if the system has no unique
/// solution.
#[allow(clippy::many_single_char_names)]
pub fn solve_3(eq1: [f64; 4], eq2: [f64; 4], eq3: [f64; 4]) -> Result<[f64; 3]> {
    let eqs = [eq1, eq2, eq3];
    let [a, b, c, d] = *pick_valid_equation(&eqs).ok_or(SolverError::SingularSystem)?;

    let reduced: [[f64; 3]; 2] = reduce_fixed(&eqs);
    let [a1, c1, d1] = *pick_valid_equation(&reduced).ok_or(SolverError::SingularSystem)?;

    let [last]: [[f64; 2]; 1] = reduce_fixed(&reduced);
    if !has_first_coefficient(&last) {
        return Err(SolverError::SingularSystem.into());
    }
    let [a2, d2] = last;

    let x = d2 / a2;
    let z = (d1 - a1 * x) / c1;
    let y = (d - (a * x + c * z)) / b;

    if x.is_finite() && y.is_finite() && z.is_finite() {
        Ok([x, y, z])
    } else {
        Err(SolverError::SingularSystem.into())
    }
}

/// Returns the first equation whose second coefficient can serve as an
/// elimination pivot, skipping equations where it is zero (or negligible next
/// to the equation's other coefficients).
pub fn pick_valid_equation<E: AsRef<[f64]>>(eqs: &[E]) -> Option<&E> {
    eqs.iter().find(|eq| has_pivot(eq.as_ref()))
}

fn validate_shape<E: AsRef<[f64]>>(eqs: &[E]) -> Result<usize> {
    let Some(first) = eqs.first() else {
        return Err(SolverError::MalformedSystem("no equations".into()).into());
    };
    let width = first.as_ref().len();
    if width < 2 {
        return Err(SolverError::MalformedSystem(format!(
            "an equation needs at least 2 values, got {width}"
        ))
        .into());
    }
    if let Some(eq) = eqs.iter().find(|eq| eq.as_ref().len() != width) {
        return Err(SolverError::MalformedSystem(format!(
            "equations differ in length ({width} vs {})",
            eq.as_ref().len()
        ))
        .into());
    }
    if eqs.len() != width - 1 {
        return Err(SolverError::MalformedSystem(format!(
            "{} equations for {} unknowns",
            eqs.len(),
            width - 1
        ))
        .into());
    }
    Ok(width)
}

/// A second coefficient this small relative to the largest coefficient of its
/// equation is cancellation noise, not a pivot.
const PIVOT_TOLERANCE: f64 = 1e-12;

fn has_pivot(eq: &[f64]) -> bool {
    let coefficients = &eq[..eq.len() - 1];
    let scale = coefficients.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    eq[1].abs() > PIVOT_TOLERANCE * scale
}

#[allow(clippy::float_cmp)]
fn has_first_coefficient(eq: &[f64]) -> bool {
    eq[0] != 0.0
}

/// Removes the second column from `eq1` by subtracting a multiple of `eq2`.
///
/// `out` receives `eq1.len() - 1` values.
fn eliminate_into(eq1: &[f64], eq2: &[f64], out: &mut [f64]) {
    let factor = eq1[1] / eq2[1];
    let mut j = 0;
    for (i, (v1, v2)) in eq1.iter().zip(eq2).enumerate() {
        if i != 1 {
            out[j] = v1 - v2 * factor;
            j += 1;
        }
    }
}

/// Copies `eq` into `out` without its (zero) second column.
fn drop_second_into(eq: &[f64], out: &mut [f64]) {
    let mut j = 0;
    for (i, v) in eq.iter().enumerate() {
        if i != 1 {
            out[j] = *v;
            j += 1;
        }
    }
}

/// Produces the reduced equation contributed by `stage[i]`, if any.
///
/// Equations without the second variable pass through with that column
/// dropped. The others are paired with the next equation that still has it;
/// the last such equation contributes nothing, which keeps the reduced system
/// square.
fn reduce_at<E: AsRef<[f64]>>(stage: &[E], i: usize, out: &mut [f64]) -> bool {
    let eq = stage[i].as_ref();
    if !has_pivot(eq) {
        drop_second_into(eq, out);
        return true;
    }
    match stage[i + 1..].iter().find(|next| has_pivot(next.as_ref())) {
        Some(next) => {
            eliminate_into(eq, next.as_ref(), out);
            true
        }
        None => false,
    }
}

fn reduce_stage(stage: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = stage[0].len() - 1;
    let mut reduced = Vec::with_capacity(stage.len() - 1);
    for i in 0..stage.len() {
        let mut out = vec![0.0; width];
        if reduce_at(stage, i, &mut out) {
            reduced.push(out);
        }
    }
    reduced
}

/// Fixed-size counterpart of [`reduce_stage`]. `R` must be `W - 1` and `S`
/// must be `K - 1`; a usable pivot must exist in `eqs`.
fn reduce_fixed<const W: usize, const R: usize, const K: usize, const S: usize>(
    eqs: &[[f64; W]; K],
) -> [[f64; R]; S] {
    let mut reduced = [[0.0; R]; S];
    let mut n = 0;
    for i in 0..K {
        if n == S {
            break;
        }
        if reduce_at(eqs, i, &mut reduced[n]) {
            n += 1;
        }
    }
    reduced
}
