use std::sync::Arc;

use arrow::array::{
    Float64Array, Float64Builder, Int64Array, ListBuilder, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (splitmix64)
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [-1, 1].
    fn jitter(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }
}

// Continental-US style extent.
const WEST: f64 = -124.0;
const EAST: f64 = -67.0;
const SOUTH: f64 = 25.0;
const NORTH: f64 = 49.0;

const COLS: usize = 18;
const ROWS: usize = 8;

const STATES: [&str; 12] = [
    "WA", "OR", "NV", "UT", "CO", "NE", "MO", "IA", "IL", "OH", "PA", "NY",
];

const NAME_STEMS: [&str; 12] = [
    "Adams", "Boone", "Clay", "Dallas", "Greene", "Jackson", "Lincoln", "Madison", "Monroe",
    "Union", "Warren", "Washington",
];

/// Octagon-ish county boundary: cell corners and edge midpoints, each
/// jittered so the grid does not look synthetic at a glance.
fn county_ring(
    west: f64,
    south: f64,
    width: f64,
    height: f64,
    rng: &mut SampleRng,
) -> Vec<(f64, f64)> {
    let margin = 0.06;
    let w = west + width * margin;
    let e = west + width * (1.0 - margin);
    let s = south + height * margin;
    let n = south + height * (1.0 - margin);
    let cx = (w + e) / 2.0;
    let cy = (s + n) / 2.0;

    let base = [
        (w, s),
        (cx, s),
        (e, s),
        (e, cy),
        (e, n),
        (cx, n),
        (w, n),
        (w, cy),
    ];

    base.iter()
        .map(|&(x, y)| {
            (
                x + rng.jitter() * width * 0.08,
                y + rng.jitter() * height * 0.08,
            )
        })
        .collect()
}

fn grade_for(score: f64) -> &'static str {
    if score >= 80.0 {
        "A"
    } else if score >= 65.0 {
        "B"
    } else if score >= 50.0 {
        "C"
    } else if score >= 35.0 {
        "D"
    } else {
        "F"
    }
}

fn main() {
    let mut rng = SampleRng::new(7);

    let cell_w = (EAST - WEST) / COLS as f64;
    let cell_h = (NORTH - SOUTH) / ROWS as f64;

    let mut all_lon: Vec<Vec<f64>> = Vec::new();
    let mut all_lat: Vec<Vec<f64>> = Vec::new();
    let mut all_name: Vec<String> = Vec::new();
    let mut all_grade: Vec<&'static str> = Vec::new();
    let mut all_fips: Vec<String> = Vec::new();
    let mut all_state: Vec<&'static str> = Vec::new();
    let mut all_score: Vec<f64> = Vec::new();
    let mut all_population: Vec<i64> = Vec::new();

    let mut idx: usize = 0;
    for row in 0..ROWS {
        for col in 0..COLS {
            let west = WEST + col as f64 * cell_w;
            let south = SOUTH + row as f64 * cell_h;
            let ring = county_ring(west, south, cell_w, cell_h, &mut rng);

            // Distancing scores trend upward toward the coasts, with noise.
            let fx = col as f64 / (COLS - 1) as f64;
            let coastal = (fx - 0.5).abs() * 2.0;
            let score = (20.0 + coastal * 55.0 + rng.next_f64() * 30.0).clamp(0.0, 100.0);

            all_lon.push(ring.iter().map(|&(x, _)| x).collect());
            all_lat.push(ring.iter().map(|&(_, y)| y).collect());
            all_name.push(format!(
                "{} {}",
                NAME_STEMS[idx % NAME_STEMS.len()],
                idx / NAME_STEMS.len() + 1
            ));
            all_grade.push(grade_for(score));
            all_fips.push(format!("{:05}", 10_000 + idx * 13));
            all_state.push(STATES[col * STATES.len() / COLS]);
            all_score.push((score * 100.0).round() / 100.0);
            all_population.push(10_000 + (rng.next_f64() * 990_000.0) as i64);

            idx += 1;
        }
    }

    // Build Arrow arrays
    let mut lon_builder = ListBuilder::new(Float64Builder::new());
    for ring in &all_lon {
        let values = lon_builder.values();
        for &v in ring {
            values.append_value(v);
        }
        lon_builder.append(true);
    }
    let lon_array = lon_builder.finish();

    let mut lat_builder = ListBuilder::new(Float64Builder::new());
    for ring in &all_lat {
        let values = lat_builder.values();
        for &v in ring {
            values.append_value(v);
        }
        lat_builder.append(true);
    }
    let lat_array = lat_builder.finish();

    let name_array = StringArray::from(all_name.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let grade_array = StringArray::from(all_grade);
    let fips_array = StringArray::from(all_fips.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let state_array = StringArray::from(all_state);
    let score_array = Float64Array::from(all_score);
    let population_array = Int64Array::from(all_population);

    let schema = Arc::new(Schema::new(vec![
        Field::new(
            "lon",
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        ),
        Field::new(
            "lat",
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        ),
        Field::new("name", DataType::Utf8, false),
        Field::new("grade", DataType::Utf8, false),
        Field::new("fips", DataType::Utf8, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("grade_distance", DataType::Float64, false),
        Field::new("population", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(lon_array),
            Arc::new(lat_array),
            Arc::new(name_array),
            Arc::new(grade_array),
            Arc::new(fips_array),
            Arc::new(state_array),
            Arc::new(score_array),
            Arc::new(population_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "counties.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {idx} counties to {output_path}");
}
