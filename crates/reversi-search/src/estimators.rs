//! Search effort estimates for exact endgame solves.
//!
//! The proof number of a position is an estimate of how many nodes an exact
//! solve needs to show that the side to move scores at least `lower`; the
//! disproof number estimates the nodes needed to show it scores less. Both
//! come from log-linear models fitted per number of empty squares on the
//! mobility of one side and on the distance between a heuristic evaluation
//! and `lower`.
//!
//! Estimates are stored as bytes on a logarithmic scale and precomputed for
//! every `(empties, mobility, delta)` triple the first time they are needed.

use std::sync::OnceLock;

use log::debug;

use crate::bitboard::Bitboard;
use crate::types::EvalLarge;

/// Largest representable proof number.
pub const MAX_PROOF_NUMBER: f64 = 1e25;

/// Number of steps of the byte scale; the last one means "more than the max".
pub const PROOF_NUMBER_STEP: u8 = 255;

const MAX_MOBILITY: u32 = 15;
const MAX_DELTA: i32 = 128;
const TABLE_SIZE: usize = 64 * 16 * (2 * MAX_DELTA as usize + 1);

/// `[a, b, c]` such that `ln PN = a + b * ln(max(moves, 1) + 2) + c * error`,
/// indexed by the number of empty squares. `moves` is the opponent's mobility.
const LOG_PROOF_NUMBER: [[f64; 3]; 64] = [
    [2.3775, -0.0135, -0.0077],
    [2.6704, -0.0135, -0.0077],
    [2.9633, -0.0135, -0.0077],
    [3.2562, -0.0135, -0.0077],
    [3.4484, 0.0531, -0.0077],
    [3.7903, 0.0611, -0.0095],
    [4.0437, 0.1433, -0.0111],
    [4.3923, 0.1815, -0.0134],
    [4.7118, 0.2290, -0.0151],
    [5.0509, 0.3189, -0.0195],
    [5.4526, 0.3808, -0.0243],
    [5.8066, 0.4850, -0.0291],
    [6.1568, 0.6330, -0.0343],
    [6.5719, 0.7582, -0.0407],
    [6.8365, 0.9411, -0.0453],
    [6.9268, 1.1992, -0.0497],
    [7.2731, 1.3660, -0.0556],
    [7.7136, 1.4870, -0.0612],
    [8.3667, 1.5015, -0.0652],
    [8.9113, 1.5736, -0.0688],
    [9.4660, 1.6287, -0.0711],
    [9.8823, 1.7680, -0.0755],
    [9.9799, 2.0293, -0.0778],
    [10.1760, 2.2368, -0.0801],
    [10.5026, 2.3894, -0.0810],
    [11.0438, 2.4437, -0.0812],
    [11.5552, 2.5013, -0.0809],
    [11.2036, 2.9100, -0.0817],
    [11.5537, 3.0210, -0.0820],
    [11.3580, 3.3440, -0.0838],
    [11.9478, 3.3756, -0.0858],
    [11.1340, 3.9379, -0.0869],
    [11.2932, 4.1384, -0.0903],
    [12.2237, 4.0371, -0.0922],
    [12.4435, 4.1864, -0.0930],
    [12.8772, 4.2497, -0.0935],
    [14.2472, 3.9304, -0.0946],
    [14.7386, 3.9651, -0.0950],
    [14.8980, 4.1735, -0.0970],
    [14.0817, 4.7402, -0.0984],
    [14.3064, 4.8891, -0.0986],
    [14.6816, 5.0126, -0.0987],
    [15.8863, 4.7816, -0.0986],
    [17.3965, 4.4429, -0.0992],
    [18.3813, 4.3203, -0.0999],
    [20.5447, 3.7845, -0.1017],
    [22.0146, 3.4876, -0.1032],
    [23.6573, 3.1384, -0.1040],
    [25.6805, 2.6265, -0.1055],
    [27.6521, 2.1471, -0.1058],
    [28.3654, 2.1083, -0.1074],
    [30.2369, 1.6629, -0.1073],
    [31.2131, 1.5556, -0.1095],
    [32.9067, 1.1731, -0.1091],
    [33.4042, 1.2356, -0.1087],
    [34.3972, 1.1098, -0.1088],
    [35.4394, 0.9344, -0.1093],
    [36.4362, 0.7680, -0.1091],
    [36.4893, 1.1315, -0.1097],
    [37.9377, 0.5617, -0.1093],
    [39.9141, -0.1785, -0.1098],
    [38.2563, 0.6285, -0.1082],
    [42.0388, 0.5295, -0.1078],
    [41.8089, 0.0181, -0.1080],
];

/// Same as [`LOG_PROOF_NUMBER`] for disproof numbers, on the player's mobility.
const LOG_DISPROOF_NUMBER: [[f64; 3]; 64] = [
    [0.7470, 1.8772, 0.0068],
    [0.8341, 1.8772, 0.0068],
    [0.9211, 1.8772, 0.0068],
    [1.0081, 1.8772, 0.0068],
    [1.2574, 1.8207, 0.0093],
    [1.4380, 1.8150, 0.0117],
    [1.7417, 1.7745, 0.0141],
    [2.0862, 1.7405, 0.0165],
    [2.3991, 1.7622, 0.0196],
    [2.9038, 1.7680, 0.0265],
    [3.4093, 1.7722, 0.0328],
    [3.7167, 1.9012, 0.0390],
    [3.9560, 2.0881, 0.0453],
    [4.2470, 2.2542, 0.0515],
    [4.5899, 2.4023, 0.0584],
    [4.8119, 2.6004, 0.0653],
    [4.8123, 2.8932, 0.0708],
    [4.7712, 3.2071, 0.0753],
    [5.0249, 3.3671, 0.0789],
    [5.4563, 3.4749, 0.0819],
    [5.3436, 3.7827, 0.0837],
    [5.7800, 3.8638, 0.0846],
    [6.1249, 3.9909, 0.0855],
    [6.5926, 4.0829, 0.0871],
    [6.9811, 4.1664, 0.0867],
    [7.5065, 4.2070, 0.0861],
    [7.9698, 4.2483, 0.0849],
    [8.4343, 4.2815, 0.0839],
    [8.7454, 4.3870, 0.0839],
    [8.7884, 4.6196, 0.0845],
    [9.2611, 4.6733, 0.0852],
    [10.1316, 4.5851, 0.0868],
    [9.0824, 5.1902, 0.0846],
    [9.1862, 5.4088, 0.0862],
    [9.8346, 5.3909, 0.0876],
    [9.1160, 5.9012, 0.0881],
    [10.0605, 5.8064, 0.0896],
    [10.5922, 5.8341, 0.0901],
    [10.2118, 6.2229, 0.0919],
    [10.5953, 6.3295, 0.0931],
    [11.0811, 6.4034, 0.0940],
    [12.6840, 6.0612, 0.0946],
    [14.5836, 5.5750, 0.0949],
    [15.6792, 5.4182, 0.0955],
    [18.2796, 4.7097, 0.0979],
    [20.0477, 4.2865, 0.0987],
    [21.2313, 4.1294, 0.0999],
    [24.3182, 3.2275, 0.0999],
    [25.9864, 2.8570, 0.1005],
    [27.5568, 2.5071, 0.1023],
    [28.2594, 2.5344, 0.1035],
    [28.8723, 2.5801, 0.1053],
    [29.8889, 2.4971, 0.1056],
    [31.5168, 2.1207, 0.1064],
    [32.2733, 2.1401, 0.1069],
    [33.0243, 2.1285, 0.1074],
    [33.4561, 2.2713, 0.1076],
    [34.1675, 2.3004, 0.1081],
    [34.9810, 2.2548, 0.1080],
    [35.4962, 2.4597, 0.1090],
    [36.8959, 1.8881, 0.1089],
    [38.4175, 1.4472, 0.1099],
    [36.1571, 2.9271, 0.1099],
    [41.8230, 0.0181, 0.1107],
];

/// Standard deviation, in discs, of the error of a one-ply evaluation,
/// indexed by the number of empty squares.
#[rustfmt::skip]
const DEPTH_ONE_ERROR: [f64; 60] = [
    2.00, 2.00, 2.00, 2.00, 6.64, 6.87, 7.64, 7.77, 8.18, 8.30, 8.72, 8.73,
    8.98, 8.71, 8.65, 8.35, 8.29, 8.05, 8.20, 7.64, 7.55, 7.05, 6.82, 6.00,
    6.36, 5.61, 5.86, 5.19, 5.76, 5.13, 5.58, 4.91, 5.19, 4.39, 4.89, 4.14,
    4.82, 4.03, 4.38, 3.83, 4.16, 3.52, 3.82, 3.20, 3.28, 2.79, 2.96, 2.41,
    2.84, 2.57, 2.51, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
];

struct EstimatorTables {
    proof_number: Box<[u8]>,
    disproof_number: Box<[u8]>,
    disproof_number_over_prob: Box<[i32]>,
    byte_to_proof_number: [f64; PROOF_NUMBER_STEP as usize + 1],
}

static TABLES: OnceLock<EstimatorTables> = OnceLock::new();

/// Base of the logarithmic byte scale.
fn log_base() -> f64 {
    MAX_PROOF_NUMBER.powf(1.0 / (PROOF_NUMBER_STEP as f64 - 1.99))
}

/// Clamps an estimate to `[1, 0.99 * MAX_PROOF_NUMBER]`.
fn bound(value: f64) -> f64 {
    value.clamp(1.0, MAX_PROOF_NUMBER * 0.99)
}

fn log_estimate(coefficients: &[f64; 3], moves: u32, error: i32) -> f64 {
    let [a, b, c] = *coefficients;
    let log_moves = ((moves.max(1) + 2) as f64).ln();
    let error = error.clamp(-70 * 8, 70 * 8) as f64;
    a + b * log_moves + c * error
}

/// Complementary error function.
///
/// Chebyshev fit from Numerical Recipes, relative error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

/// Cumulative distribution function of the standard normal distribution.
fn gaussian_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * std::f64::consts::FRAC_1_SQRT_2)
}

/// Probability that a one-ply evaluation `delta` above a threshold is in
/// fact below it.
fn probability_below(empties: u32, delta: i32) -> f64 {
    let error = DEPTH_ONE_ERROR
        .get(empties as usize)
        .map_or(3.0, |&e| e.max(3.0));
    1.0 - gaussian_cdf(delta as f64 / (8.0 * error))
}

/// Converts a proof number to its byte on the logarithmic scale.
pub fn proof_number_to_byte(proof_number: f64) -> u8 {
    if proof_number <= 1e-8 {
        0
    } else if proof_number > MAX_PROOF_NUMBER {
        PROOF_NUMBER_STEP
    } else {
        let rescaled = proof_number.ln() / log_base().ln() + 1.0;
        rescaled.round().clamp(0.0, PROOF_NUMBER_STEP as f64) as u8
    }
}

fn byte_to_proof_number_explicit(byte: u8) -> f64 {
    match byte {
        0 => 0.0,
        PROOF_NUMBER_STEP => f32::MAX as f64,
        b => log_base().powi(b as i32 - 1),
    }
}

#[inline(always)]
fn offset(empties: u32, moves: u32, delta: i32) -> usize {
    debug_assert!(empties < 64 && moves <= MAX_MOBILITY);
    debug_assert!((-MAX_DELTA..=MAX_DELTA).contains(&delta));
    empties as usize | (moves as usize) << 6 | ((delta + MAX_DELTA) as usize) << 10
}

fn build_tables() -> EstimatorTables {
    let mut proof_number = vec![0u8; TABLE_SIZE].into_boxed_slice();
    let mut disproof_number = vec![0u8; TABLE_SIZE].into_boxed_slice();
    let mut disproof_number_over_prob = vec![0i32; TABLE_SIZE].into_boxed_slice();

    for empties in 0..64u32 {
        let proof = &LOG_PROOF_NUMBER[empties as usize];
        let disproof = &LOG_DISPROOF_NUMBER[empties as usize];
        for moves in 0..=MAX_MOBILITY {
            for delta in -MAX_DELTA..=MAX_DELTA {
                let i = offset(empties, moves, delta);
                let pn = bound(log_estimate(proof, moves, delta).exp());
                let dn = bound(log_estimate(disproof, moves, delta).exp());
                proof_number[i] = proof_number_to_byte(pn);
                disproof_number[i] = proof_number_to_byte(dn);
                let over_prob = (dn / probability_below(empties, delta)).min(i32::MAX as f64 - 2.0);
                disproof_number_over_prob[i] = over_prob.round() as i32;
            }
        }
    }

    let mut byte_to_proof_number = [0.0; PROOF_NUMBER_STEP as usize + 1];
    for (byte, value) in byte_to_proof_number.iter_mut().enumerate() {
        *value = byte_to_proof_number_explicit(byte as u8);
    }

    debug!("proof number tables built: {} entries", TABLE_SIZE);
    EstimatorTables {
        proof_number,
        disproof_number,
        disproof_number_over_prob,
        byte_to_proof_number,
    }
}

#[inline(always)]
fn tables() -> &'static EstimatorTables {
    TABLES.get_or_init(build_tables)
}

/// Builds the estimate tables ahead of the first search.
pub fn init() {
    tables();
}

#[inline(always)]
fn table_offset(player: Bitboard, opponent: Bitboard, mover: bool, lower: EvalLarge, approx_eval: EvalLarge) -> usize {
    let empties = (!(player | opponent)).count();
    let mobility = if mover {
        player.moves(opponent).count()
    } else {
        opponent.moves(player).count()
    };
    let delta = (approx_eval - lower).value() >> 3;
    offset(
        empties.min(63),
        mobility.min(MAX_MOBILITY),
        delta.clamp(-MAX_DELTA, MAX_DELTA),
    )
}

/// Estimated nodes, as a byte, to prove that the side to move scores at least `lower`.
///
/// `approx_eval` is a heuristic evaluation of the position for the side to move.
#[inline]
pub fn proof_number(player: Bitboard, opponent: Bitboard, lower: EvalLarge, approx_eval: EvalLarge) -> u8 {
    tables().proof_number[table_offset(player, opponent, false, lower, approx_eval)]
}

/// Estimated nodes, as a byte, to prove that the side to move scores less than `lower`.
#[inline]
pub fn disproof_number(player: Bitboard, opponent: Bitboard, lower: EvalLarge, approx_eval: EvalLarge) -> u8 {
    tables().disproof_number[table_offset(player, opponent, true, lower, approx_eval)]
}

/// Disproof number divided by the probability that the disproof succeeds.
///
/// Lower is better: cheap disproofs of likely-losing positions come first.
#[inline]
pub fn disproof_number_over_prob(
    player: Bitboard,
    opponent: Bitboard,
    lower: EvalLarge,
    approx_eval: EvalLarge,
) -> i32 {
    tables().disproof_number_over_prob[table_offset(player, opponent, true, lower, approx_eval)]
}

/// Converts a byte back to a proof number.
#[inline]
pub fn byte_to_proof_number(byte: u8) -> f64 {
    tables().byte_to_proof_number[byte as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_byte_scale() {
        assert_eq!(proof_number_to_byte(0.0), 0);
        assert_eq!(proof_number_to_byte(1.0), 1);
        assert_eq!(proof_number_to_byte(2e25), PROOF_NUMBER_STEP);
        assert_eq!(byte_to_proof_number(0), 0.0);
        assert_eq!(byte_to_proof_number(1), 1.0);

        for pn in [3.0, 100.0, 12345.0, 1e10, 1e20] {
            let back = byte_to_proof_number(proof_number_to_byte(pn));
            // One step of the scale is about 25%.
            assert!((back / pn - 1.0).abs() < 0.15, "{pn} -> {back}");
        }
    }

    #[test]
    fn test_erfc() {
        assert!((erfc(0.0) - 1.0).abs() < 1e-7);
        assert!((erfc(1.0) - 0.157_299_207).abs() < 1e-6);
        assert!((erfc(-1.0) - 1.842_700_793).abs() < 1e-6);
        assert!((gaussian_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!(gaussian_cdf(3.0) > 0.998);
    }

    #[test]
    fn test_bytes_are_in_range() {
        let t = tables();
        assert!(t.proof_number.iter().all(|&b| (1..PROOF_NUMBER_STEP).contains(&b)));
        assert!(t.disproof_number.iter().all(|&b| (1..PROOF_NUMBER_STEP).contains(&b)));
        assert!(t.disproof_number_over_prob.iter().all(|&v| v >= 1));
    }

    #[test]
    fn test_proof_number_decreases_with_eval() {
        let pos = Position::from_string(
            "--XXXXX-OOOXXO--OOXXXXXOOXOXXOXXOXXOXXXXOXOOXX-X--OOOX----OOOO--",
            'X',
        )
        .unwrap();
        let lower = EvalLarge::ZERO;
        let low = proof_number(pos.player, pos.opponent, lower, EvalLarge::from_raw(-200));
        let high = proof_number(pos.player, pos.opponent, lower, EvalLarge::from_raw(200));
        assert!(high < low);

        let low = disproof_number(pos.player, pos.opponent, lower, EvalLarge::from_raw(-200));
        let high = disproof_number(pos.player, pos.opponent, lower, EvalLarge::from_raw(200));
        assert!(high > low);
    }

    #[test]
    fn test_disproof_over_prob_at_least_disproof() {
        let pos = Position::new();
        for eval in [-400, -80, 0, 80, 400] {
            let approx = EvalLarge::from_raw(eval);
            let dn = byte_to_proof_number(disproof_number(pos.player, pos.opponent, EvalLarge::ZERO, approx));
            let over = disproof_number_over_prob(pos.player, pos.opponent, EvalLarge::ZERO, approx) as f64;
            // Rounding to bytes loses up to half a step.
            assert!(over >= dn * 0.85, "{eval}: {over} < {dn}");
        }
    }
}
