//! Built-in datasets analyzed by the report commands.

use serde::Serialize;

/// Fertilizer usage per plot, in grams.
pub(crate) const FERTILIZER_GRAMS: [f64; 23] = [
    65.0, 64.0, 80.0, 66.0, 62.0, 67.0, 75.0, 54.0, 50.0, 74.0, 68.0, 65.0, 67.0, 55.0, 73.0, 71.0,
    74.0, 61.0, 64.0, 52.0, 64.0, 60.0, 72.0,
];

/// Fertilizer usage per field, in kilograms.
pub(crate) const FERTILIZER_KG: [f64; 60] = [
    22.5, 23.1, 21.8, 24.0, 22.7, 23.5, 24.8, 22.0, 23.9, 25.2, //
    21.5, 23.3, 24.5, 22.2, 23.8, 25.5, 21.9, 24.2, 22.8, 23.6, //
    25.0, 22.1, 24.9, 23.0, 22.9, 24.1, 23.7, 22.4, 24.7, 23.4, //
    22.6, 24.3, 23.2, 25.1, 21.7, 24.4, 22.3, 25.3, 23.8, 24.6, //
    21.6, 23.9, 22.5, 25.4, 23.1, 24.0, 22.9, 23.5, 24.8, 22.2, //
    23.7, 25.0, 21.8, 24.2, 23.0, 22.7, 24.5, 23.3, 20.0, 24.9,
];

/// Grain yield per plot, in kilograms.
pub(crate) const WHEAT_YIELD: [f64; 30] = [
    145.0, 152.0, 138.0, 167.0, 155.0, 161.0, 143.0, 158.0, 149.0, 172.0, //
    162.0, 147.0, 154.0, 168.0, 141.0, 159.0, 165.0, 150.0, 163.0, 140.0, //
    156.0, 169.0, 144.0, 160.0, 153.0, 166.0, 142.0, 157.0, 151.0, 164.0,
];

/// Exam marks of 25 students, out of 50.
pub(crate) const STUDENT_MARKS: [f64; 25] = [
    10.0, 43.0, 25.0, 34.0, 31.0, 9.0, 25.0, 30.0, 28.0, 12.0, 26.0, 19.0, 11.0, 8.0, 35.0, 41.0,
    28.0, 19.0, 8.0, 21.0, 20.0, 47.0, 32.0, 28.0, 21.0,
];

/// Weekly work hours of 30 employees, in employee ID order.
pub(crate) const WORK_HOURS: [f64; 30] = [
    38.0, 42.0, 35.0, 40.0, 44.0, 37.0, 41.0, 39.0, 45.0, 36.0, //
    43.0, 38.0, 40.0, 42.0, 35.0, 44.0, 39.0, 41.0, 37.0, 43.0, //
    36.0, 45.0, 38.0, 40.0, 42.0, 39.0, 41.0, 37.0, 44.0, 40.0,
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Crunchiness {
    #[display("high")]
    High,
    #[display("medium")]
    Medium,
    #[display("low")]
    Low,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Quality {
    #[display("good")]
    Good,
    #[display("bad")]
    Bad,
}

/// One inspected apple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct AppleRecord {
    pub(crate) id: u32,
    /// Grams.
    pub(crate) weight: f64,
    pub(crate) crunchiness: Crunchiness,
    /// Sweetness score, 0 to 4.
    pub(crate) sweetness: f64,
    /// Ordinal ripeness, 1 (unripe) to 4 (very ripe).
    pub(crate) ripeness: u8,
    pub(crate) quality: Quality,
}

const fn apple(
    id: u32,
    weight: f64,
    crunchiness: Crunchiness,
    sweetness: f64,
    ripeness: u8,
    quality: Quality,
) -> AppleRecord {
    AppleRecord {
        id,
        weight,
        crunchiness,
        sweetness,
        ripeness,
        quality,
    }
}

pub(crate) const APPLES: [AppleRecord; 20] = {
    use Crunchiness::{High, Low, Medium};
    use Quality::{Bad, Good};
    [
        apple(1, 70.0, High, 0.5, 1, Good),
        apple(2, 90.0, Medium, 1.0, 2, Bad),
        apple(3, 83.0, High, 1.0, 1, Good),
        apple(4, 85.0, Low, 3.0, 3, Good),
        apple(5, 90.0, Low, 3.0, 3, Good),
        apple(6, 78.0, High, 1.5, 2, Good),
        apple(7, 78.0, High, 0.5, 4, Bad),
        apple(8, 93.0, Medium, 1.0, 4, Good),
        apple(9, 85.0, High, 3.5, 3, Good),
        apple(10, 88.0, Low, 2.0, 3, Bad),
        apple(11, 86.0, High, 2.0, 2, Good),
        apple(12, 92.0, Low, 2.0, 2, Good),
        apple(13, 95.0, Medium, 1.5, 3, Bad),
        apple(14, 100.0, High, 4.0, 3, Good),
        apple(15, 94.0, Medium, 2.5, 2, Good),
        apple(16, 96.0, Low, 2.0, 4, Good),
        apple(17, 70.0, Low, 1.0, 1, Good),
        apple(18, 82.0, Medium, 3.0, 1, Bad),
        apple(19, 90.0, High, 3.0, 2, Bad),
        apple(20, 78.0, High, 0.5, 2, Bad),
    ]
};
