use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One customer record.
struct Row {
    id: i64,
    age: Option<f64>,
    income: f64,
    city: String,
    member: bool,
}

fn generate_rows(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    let cities = ["Paris", "London", "Berlin", "Madrid", "Rome", "Lisbon"];
    let mut rows: Vec<Row> = (0..n)
        .map(|i| {
            let age = rng.gauss(40.0, 12.0).clamp(18.0, 90.0).round();
            // Income tracks age closely so the correlation rule fires.
            let income = (age * 1_100.0 + rng.gauss(0.0, 4_000.0)).round();
            Row {
                id: i as i64,
                // Roughly 5% of ages are missing.
                age: (rng.next_f64() > 0.05).then_some(age),
                income,
                city: rng.pick(&cities).to_string(),
                member: rng.next_f64() > 0.5,
            }
        })
        .collect();

    // A few exact duplicates for the profile.
    for src in 0..3.min(rows.len()) {
        let r = &rows[src];
        rows.push(Row {
            id: r.id,
            age: r.age,
            income: r.income,
            city: r.city.clone(),
            member: r.member,
        });
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["id", "age", "income", "city", "member"])?;
    for r in rows {
        writer.write_record([
            r.id.to_string(),
            r.age.map(|a| a.to_string()).unwrap_or_default(),
            r.income.to_string(),
            r.city.clone(),
            r.member.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("age", DataType::Float64, true),
        Field::new("income", DataType::Float64, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("member", DataType::Boolean, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.income))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.city.as_str()))),
        Arc::new(BooleanArray::from(rows.iter().map(|r| r.member).collect::<Vec<_>>())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 500);

    write_csv("sample_data.csv", &rows)?;
    write_parquet("sample_data.parquet", &rows)?;

    println!(
        "Wrote {} rows to sample_data.csv and sample_data.parquet",
        rows.len()
    );
    Ok(())
}
