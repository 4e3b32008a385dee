use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeListArray, ListArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config;

use super::model::{AttributeValue, County, CountyDataset, Grade, Ring};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a county dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `lon` and `lat` list columns (outer ring) plus attributes
/// * `.json` / `.geojson` – GeoJSON FeatureCollection of Polygon/MultiPolygon
/// * `.csv` – `lon` and `lat` columns containing semicolon-separated floats
pub fn load_file(path: &Path) -> Result<CountyDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" | "geojson" => {
            let text = std::fs::read_to_string(path).context("reading GeoJSON file")?;
            parse_geojson(&text)
        }
        "csv" => {
            let reader = csv::Reader::from_path(path).context("opening CSV")?;
            read_csv(reader)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Shared row assembly
// ---------------------------------------------------------------------------

/// Build a [`County`] from parsed rings and raw attributes.  The name
/// attribute is optional (a placeholder is synthesized); the grade attribute
/// is required and must parse as a letter grade.
fn county_from_parts(
    rings: Vec<Ring>,
    mut attributes: BTreeMap<String, AttributeValue>,
    row: usize,
) -> Result<County> {
    if rings.iter().all(|r| r.len() < 3) {
        bail!("Feature {row}: no ring with at least 3 vertices");
    }

    let name = match attributes.remove(config::NAME_FIELD) {
        Some(AttributeValue::Text(s)) => s,
        Some(other) => other.to_string(),
        None => format!("county {row}"),
    };

    let grade: Grade = match attributes.remove(config::GRADE_FIELD) {
        Some(AttributeValue::Text(s)) => s
            .parse()
            .with_context(|| format!("Feature {row} ('{name}')"))?,
        Some(other) => bail!("Feature {row} ('{name}'): grade must be text, got {other}"),
        None => bail!(
            "Feature {row} ('{name}'): missing '{}' attribute",
            config::GRADE_FIELD
        ),
    };

    Ok(County {
        name,
        grade,
        rings,
        attributes,
    })
}

// ---------------------------------------------------------------------------
// GeoJSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: serde_json::Map<String, JsonValue>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: JsonValue,
}

/// Parse a GeoJSON FeatureCollection.  Each feature's properties become
/// county attributes; `name` and `grade` properties are lifted out.
fn parse_geojson(text: &str) -> Result<CountyDataset> {
    let collection: FeatureCollection =
        serde_json::from_str(text).context("parsing GeoJSON FeatureCollection")?;

    let mut counties = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.iter().enumerate() {
        let rings = match feature.geometry.kind.as_str() {
            "Polygon" => polygon_rings(&feature.geometry.coordinates, i)?,
            "MultiPolygon" => {
                let polygons = feature
                    .geometry
                    .coordinates
                    .as_array()
                    .with_context(|| format!("Feature {i}: MultiPolygon coordinates"))?;
                let mut rings = Vec::new();
                for polygon in polygons {
                    rings.extend(polygon_rings(polygon, i)?);
                }
                rings
            }
            other => bail!("Feature {i}: unsupported geometry type '{other}'"),
        };

        let mut attributes = BTreeMap::new();
        for (key, val) in &feature.properties {
            attributes.insert(key.clone(), json_to_attribute(val));
        }

        counties.push(county_from_parts(rings, attributes, i)?);
    }

    Ok(CountyDataset::from_counties(counties))
}

/// Decode one GeoJSON polygon: an array of rings, each an array of
/// `[lon, lat, ...]` positions.
fn polygon_rings(coordinates: &JsonValue, row: usize) -> Result<Vec<Ring>> {
    let raw_rings = coordinates
        .as_array()
        .with_context(|| format!("Feature {row}: polygon coordinates"))?;

    let mut rings = Vec::with_capacity(raw_rings.len());
    for (r, raw_ring) in raw_rings.iter().enumerate() {
        let positions = raw_ring
            .as_array()
            .with_context(|| format!("Feature {row}, ring {r}: expected position array"))?;

        let mut ring: Ring = Vec::with_capacity(positions.len());
        for (p, pos) in positions.iter().enumerate() {
            let coords = pos
                .as_array()
                .with_context(|| format!("Feature {row}, ring {r}, position {p}"))?;
            if coords.len() < 2 {
                bail!("Feature {row}, ring {r}, position {p}: need [lon, lat]");
            }
            let lon = coords[0]
                .as_f64()
                .with_context(|| format!("Feature {row}, ring {r}, position {p}: lon"))?;
            let lat = coords[1]
                .as_f64()
                .with_context(|| format!("Feature {row}, ring {r}, position {p}: lat"))?;
            ring.push([lon, lat]);
        }

        // GeoJSON rings repeat the first vertex; the implicit closing edge
        // makes the duplicate redundant.
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        rings.push(ring);
    }
    Ok(rings)
}

fn json_to_attribute(val: &JsonValue) -> AttributeValue {
    match val {
        JsonValue::String(s) => AttributeValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                AttributeValue::Float(f)
            } else {
                AttributeValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Null => AttributeValue::Null,
        other => AttributeValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names.
/// `lon` and `lat` columns contain semicolon-separated floats (outer ring):
///   `"-93.1;-92.8;-92.9"`, `"41.5;41.6;41.2"`
/// All other columns are treated as attributes.
fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<CountyDataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let lon_idx = headers
        .iter()
        .position(|h| h == "lon")
        .context("CSV missing 'lon' column")?;
    let lat_idx = headers
        .iter()
        .position(|h| h == "lat")
        .context("CSV missing 'lat' column")?;

    let mut counties = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let lon = parse_semicolon_floats(record.get(lon_idx).unwrap_or(""), row_no, "lon")?;
        let lat = parse_semicolon_floats(record.get(lat_idx).unwrap_or(""), row_no, "lat")?;

        if lon.len() != lat.len() {
            bail!(
                "CSV row {row_no}: lon has {} values but lat has {}",
                lon.len(),
                lat.len()
            );
        }

        let ring: Ring = lon.into_iter().zip(lat).map(|(x, y)| [x, y]).collect();

        let mut attributes = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == lon_idx || col_idx == lat_idx {
                continue;
            }
            let col_name = &headers[col_idx];
            attributes.insert(col_name.clone(), guess_attribute_type(value));
        }

        counties.push(county_from_parts(vec![ring], attributes, row_no)?);
    }

    Ok(CountyDataset::from_counties(counties))
}

fn parse_semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

fn guess_attribute_type(s: &str) -> AttributeValue {
    if s.is_empty() {
        return AttributeValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return AttributeValue::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return AttributeValue::Float(f);
    }
    if s == "true" || s == "false" {
        return AttributeValue::Bool(s == "true");
    }
    AttributeValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing county features.
///
/// Expected schema:
/// - `lon`: List<Float64> or LargeList<Float64> – outer-ring longitudes
/// - `lat`: List<Float64> or LargeList<Float64> – outer-ring latitudes
/// - `grade`: Utf8 letter grade
/// - Any other columns are treated as attributes (strings, ints, floats, bools)
fn load_parquet(path: &Path) -> Result<CountyDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut counties = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let lon_idx = schema
            .index_of("lon")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'lon' column"))?;
        let lat_idx = schema
            .index_of("lat")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'lat' column"))?;

        let lon_col = batch.column(lon_idx);
        let lat_col = batch.column(lat_idx);

        // Attribute column indices (everything except lon, lat)
        let attr_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != lon_idx && *i != lat_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..n_rows {
            let lon = extract_f64_list(lon_col, row)
                .with_context(|| format!("Row {row}: failed to read 'lon'"))?;
            let lat = extract_f64_list(lat_col, row)
                .with_context(|| format!("Row {row}: failed to read 'lat'"))?;

            if lon.len() != lat.len() {
                bail!(
                    "Row {row}: lon has {} values but lat has {}",
                    lon.len(),
                    lat.len()
                );
            }

            let ring: Ring = lon.into_iter().zip(lat).map(|(x, y)| [x, y]).collect();

            let mut attributes = BTreeMap::new();
            for (col_idx, col_name) in &attr_cols {
                let col_array = batch.column(*col_idx);
                let value = extract_attribute_value(col_array, row);
                attributes.insert(col_name.clone(), value);
            }

            counties.push(county_from_parts(vec![ring], attributes, row_base + row)?);
        }
        row_base += n_rows;
    }

    Ok(CountyDataset::from_counties(counties))
}

// -- Parquet / Arrow helpers --

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    // The inner array can be Float64 or Float32
    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}

/// Extract a single attribute value from an Arrow column at a given row.
fn extract_attribute_value(col: &Arc<dyn Array>, row: usize) -> AttributeValue {
    if col.is_null(row) {
        return AttributeValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                AttributeValue::Text(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                AttributeValue::Text(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            AttributeValue::Int(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            AttributeValue::Int(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            AttributeValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            AttributeValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            AttributeValue::Bool(arr.value(row))
        }
        _ => AttributeValue::Text(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::Grade;
    use super::*;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-93.0, 41.0], [-92.0, 41.0], [-92.0, 42.0], [-93.0, 42.0], [-93.0, 41.0]]]
                },
                "properties": {
                    "name": "Polk",
                    "grade": "B",
                    "grade_distance": 74.5,
                    "fips": "19153"
                }
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-90.0, 30.0], [-89.0, 30.0], [-89.0, 31.0]]],
                        [[[-88.0, 30.0], [-87.0, 30.0], [-87.0, 31.0]]]
                    ]
                },
                "properties": {
                    "name": "Coastal",
                    "grade": "F",
                    "grade_distance": 12.0
                }
            }
        ]
    }"#;

    #[test]
    fn geojson_polygons_and_properties_are_parsed() {
        let dataset = parse_geojson(GEOJSON).unwrap();
        assert_eq!(dataset.len(), 2);

        let polk = &dataset.counties[0];
        assert_eq!(polk.name, "Polk");
        assert_eq!(polk.grade, Grade::B);
        // Closing vertex dropped
        assert_eq!(polk.rings[0].len(), 4);
        assert_eq!(
            polk.attribute("fips"),
            Some(&AttributeValue::Text("19153".to_string()))
        );

        let coastal = &dataset.counties[1];
        assert_eq!(coastal.rings.len(), 2);
        assert_eq!(coastal.grade, Grade::F);

        assert_eq!(dataset.attribute_names, ["fips", "grade_distance"]);
    }

    #[test]
    fn geojson_rejects_unknown_grade() {
        let text = GEOJSON.replace("\"grade\": \"B\"", "\"grade\": \"Z\"");
        let err = parse_geojson(&text).unwrap_err();
        assert!(err.to_string().contains("Feature 0"), "{err:#}");
    }

    #[test]
    fn geojson_rejects_unsupported_geometry() {
        let text = GEOJSON.replace("\"Polygon\"", "\"Point\"");
        assert!(parse_geojson(&text).is_err());
    }

    #[test]
    fn csv_rows_become_counties() {
        let data = "\
name,grade,grade_distance,lon,lat,state
Story,A,91.25,-93.6;-93.4;-93.5,42.0;42.0;42.3,IA
Linn,C,58,-91.7;-91.5;-91.6,41.9;41.9;42.2,IA
";
        let dataset = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(dataset.len(), 2);

        let story = &dataset.counties[0];
        assert_eq!(story.name, "Story");
        assert_eq!(story.grade, Grade::A);
        assert_eq!(
            story.attribute("grade_distance"),
            Some(&AttributeValue::Float(91.25))
        );
        // Integral score guessed as Int still filters numerically
        assert_eq!(
            dataset.counties[1].attribute("grade_distance"),
            Some(&AttributeValue::Int(58))
        );
        assert_eq!(
            story.attribute("state"),
            Some(&AttributeValue::Text("IA".to_string()))
        );
    }

    #[test]
    fn csv_rejects_mismatched_ring_lengths() {
        let data = "\
name,grade,lon,lat
Broken,B,-93.6;-93.4,42.0;42.0;42.3
";
        let err = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap_err();
        assert!(err.to_string().contains("lon has 2"), "{err:#}");
    }

    #[test]
    fn csv_requires_grade_column() {
        let data = "\
name,lon,lat
Nameless,-93.6;-93.4;-93.5,42.0;42.0;42.3
";
        assert!(read_csv(csv::Reader::from_reader(data.as_bytes())).is_err());
    }
}
