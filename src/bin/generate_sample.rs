use anyhow::Context;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn choose<'a, T>(&mut self, options: &'a [T]) -> &'a T {
        &options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Serialize)]
struct SampleRow {
    #[serde(rename = "damagedStateAbbreviation")]
    damaged_state_abbreviation: Option<String>,
    #[serde(rename = "residenceType")]
    residence_type: Option<String>,
    #[serde(rename = "tsaEligible")]
    tsa_eligible: Option<i64>,
    #[serde(rename = "repairAmount")]
    repair_amount: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let states = ["FL", "LA", "NC", "PR", "TX"];
    let residence_types = ["Apartment", "House/Duplex", "Mobile Home", "Townhouse"];

    let output_path = "fema_applications.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let rows = 2000;
    for i in 0..rows {
        let eligible = rng.next_f64() < 0.35;

        // Eligible households skew toward higher repair costs.
        let log_mean = if eligible { 9.2 } else { 8.3 };
        let amount = rng.gauss(log_mean, 0.8).exp().max(0.0);

        // Sprinkle nulls and a few out-of-range codes so every edge path in
        // the dashboard is reachable from generated data.
        let state = if rng.next_f64() < 0.01 {
            None
        } else {
            Some(rng.choose(&states).to_string())
        };
        let residence = if rng.next_f64() < 0.02 {
            None
        } else {
            Some(rng.choose(&residence_types).to_string())
        };
        let tsa_eligible = if i % 500 == 499 {
            Some(2)
        } else if rng.next_f64() < 0.01 {
            None
        } else {
            Some(i64::from(eligible))
        };
        let repair_amount = if rng.next_f64() < 0.03 {
            None
        } else {
            Some((amount * 100.0).round() / 100.0)
        };

        writer.serialize(SampleRow {
            damaged_state_abbreviation: state,
            residence_type: residence,
            tsa_eligible,
            repair_amount,
        })?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {rows} applications to {output_path}");
    Ok(())
}
