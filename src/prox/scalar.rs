//! Scalar closed forms underlying the elementwise catalog
//!
//! Each function solves $`\mathrm{arg\,min}_x\, t f(x) + \frac12 (x - v)^2`$
//! for one convex scalar `f`. The elementwise operators apply these maps
//! independently per coordinate, and the spectral operators apply them to
//! eigenvalues or singular values, so anything fixed here is fixed
//! everywhere.
//!
//! The non-algebraic cases (`exp`, `neg_entr`, `logistic`) reduce to a
//! monotone scalar root-find and are solved by a bracketed Newton
//! iteration that falls back to bisection whenever a step leaves the
//! bracket, so they converge for any finite input.

use num_traits::Float;

/// Soft threshold: prox of `f(x) = |x|`.
pub fn abs<S: Float>(v: S, t: S) -> S {
    if v > t {
        v - t
    } else if v < -t {
        v + t
    } else {
        S::zero()
    }
}

/// Prox of a constant function: the identity map.
pub fn constant<S: Float>(v: S, _t: S) -> S {
    v
}

/// Prox of `f(x) = e^x`.
///
/// The optimality condition `x + t e^x = v` rearranges to
/// `w + ln w = v + ln t` for `w = t e^x`, i.e. `w` is the Wright omega
/// function of `v + ln t`, and `x = v - w`.
pub fn exp<S: Float>(v: S, t: S) -> S {
    v - wright_omega(v + t.ln())
}

/// Prox of the Huber penalty with threshold `m`:
/// `f(x) = x^2` for `|x| <= m`, `2m|x| - m^2` beyond.
pub fn huber<S: Float>(v: S, t: S, m: S) -> S {
    let two = S::from(2.).unwrap();
    let width = two * t + S::one();
    if v.abs() <= m * width {
        v / width
    } else {
        v - two * m * t * v.signum()
    }
}

/// Prox of `f(x) = x`.
pub fn identity<S: Float>(v: S, t: S) -> S {
    v - t
}

/// Prox of the logistic loss `f(x) = ln(1 + e^{-yx})` for a label `y`.
///
/// `y = -1` recovers the plain logistic penalty `ln(1 + e^x)`. The
/// optimality condition `x - v - t y \sigma(-yx) = 0` is strictly
/// increasing in `x` and its root lies in `[v - |ty|, v + |ty|]`.
pub fn logistic<S: Float>(v: S, t: S, y: S) -> S {
    let one = S::one();
    let two = S::from(2.).unwrap();
    let reach = (t * y).abs();
    let mut lo = v - reach;
    let mut hi = v + reach;
    let mut x = v;
    for _ in 0..64 {
        let s = sigmoid(-y * x);
        let g = x - v - t * y * s;
        if g > S::zero() {
            hi = x;
        } else {
            lo = x;
        }
        let dg = one + t * y * y * s * (one - s);
        let mut next = x - g / dg;
        if !(next > lo && next < hi) {
            next = (lo + hi) / two;
        }
        if (next - x).abs() <= S::epsilon() * (one + x.abs()) {
            return next;
        }
        x = next;
    }
    x
}

/// Prox of the negative part `f(x) = max(-x, 0)`.
pub fn neg<S: Float>(v: S, t: S) -> S {
    if v < -t {
        v + t
    } else if v > S::zero() {
        v
    } else {
        S::zero()
    }
}

/// Prox of the negative entropy `f(x) = x ln x`.
///
/// The optimality condition `x + t ln x = v - t` scales to the same
/// Wright-omega equation as [`exp`]: `x = t\,\omega((v - t)/t - \ln t)`.
pub fn neg_entr<S: Float>(v: S, t: S) -> S {
    t * wright_omega((v - t) / t - t.ln())
}

/// Prox of `f(x) = -ln x`, the positive root of `x^2 - vx - t = 0`.
///
/// The two branches are algebraically identical; the `v < 0` form
/// avoids the catastrophic cancellation the quadratic formula suffers
/// when `v` is large and negative. The same map drives the
/// negative-log-determinant operator, applied per eigenvalue.
pub fn neg_log<S: Float>(v: S, t: S) -> S {
    let two = S::from(2.).unwrap();
    let four = S::from(4.).unwrap();
    let root = (v * v + four * t).sqrt();
    if v >= S::zero() {
        (v + root) / two
    } else {
        two * t / (root - v)
    }
}

/// Prox of the positive part `f(x) = max(x, 0)`.
pub fn pos<S: Float>(v: S, t: S) -> S {
    if v > t {
        v - t
    } else if v < S::zero() {
        v
    } else {
        S::zero()
    }
}

/// Prox of `f(x) = x^2`.
pub fn sum_squares<S: Float>(v: S, t: S) -> S {
    let two = S::from(2.).unwrap();
    v / (two * t + S::one())
}

/// Numerically stable logistic sigmoid.
fn sigmoid<S: Float>(z: S) -> S {
    let one = S::one();
    if z >= S::zero() {
        one / (one + (-z).exp())
    } else {
        let e = z.exp();
        e / (one + e)
    }
}

/// Wright omega function: the positive root of `w + ln w = c`.
///
/// Solved by Newton within the bracket `[e^{c-1}, 1]` (for `c < 1`) or
/// `[1, c]` (for `c >= 1`); both endpoints straddle the root because
/// `w + ln w` is strictly increasing.
fn wright_omega<S: Float>(c: S) -> S {
    let one = S::one();
    let two = S::from(2.).unwrap();
    let (mut lo, mut hi) = if c >= one {
        (one, c)
    } else {
        ((c - one).exp(), one)
    };
    if lo == hi {
        return lo;
    }
    let mut w = (lo + hi) / two;
    for _ in 0..64 {
        let g = w + w.ln() - c;
        if g > S::zero() {
            hi = w;
        } else {
            lo = w;
        }
        // Newton step g / (1 + 1/w), kept inside the bracket
        let mut next = w - g * w / (w + one);
        if !(next > lo && next < hi) {
            next = (lo + hi) / two;
        }
        if (next - w).abs() <= S::epsilon() * (one + w.abs()) {
            return next;
        }
        w = next;
    }
    w
}
