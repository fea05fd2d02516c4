//! Airport file loading
//!
//! Two line formats are understood:
//! - seed files, one `IATA,latitude,longitude` triple per line, used to fill
//!   the registry at startup
//! - full airport records (`id,name,city,country,iata,icao,lat,lon,alt,
//!   utc_offset,dst`), optionally double-quoted, used by the bulk uploader

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::WeatherError;
use crate::models::AirportEntry;

const RECORD_MIN_FIELDS: usize = 11;

/// Parse seed triples. Blank lines are skipped; every entry must pass the
/// same checks as an airport added at runtime.
pub fn parse_seed<R: BufRead>(reader: R) -> crate::Result<Vec<AirportEntry>> {
    let mut airports = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [iata, lat, lon] = fields.as_slice() else {
            return Err(WeatherError::parse(
                line_no,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        };
        let latitude = parse_coordinate(lat, "latitude", line_no)?;
        let longitude = parse_coordinate(lon, "longitude", line_no)?;
        let airport = AirportEntry::new(*iata, latitude, longitude);
        airport
            .validate()
            .map_err(|e| WeatherError::parse(line_no, e.to_string()))?;
        airports.push(airport);
    }
    debug!(count = airports.len(), "parsed seed airports");
    Ok(airports)
}

/// Read a seed file from disk
pub fn load_seed_file(path: impl AsRef<Path>) -> crate::Result<Vec<AirportEntry>> {
    let file = File::open(path.as_ref())?;
    parse_seed(BufReader::new(file))
}

/// Parse one full airport record.
///
/// An unparseable latitude or longitude is logged and left at 0.0, which the
/// registry then rejects as unset.
pub fn parse_airport_record(line: &str, line_no: usize) -> crate::Result<AirportEntry> {
    let fields: Vec<&str> = line.split(',').map(unquote).collect();
    if fields.len() < RECORD_MIN_FIELDS {
        return Err(WeatherError::parse(
            line_no,
            format!(
                "expected at least {RECORD_MIN_FIELDS} fields, found {}",
                fields.len()
            ),
        ));
    }

    let mut airport = AirportEntry::new(fields[4], 0.0, 0.0)
        .with_name(fields[1])
        .with_city(fields[2])
        .with_country(fields[3])
        .with_icao(fields[5])
        .with_timezone(fields[9])
        .with_dst(fields[10]);

    match fields[6].parse::<f64>() {
        Ok(latitude) => airport.latitude = latitude,
        Err(_) => warn!(line = line_no, value = fields[6], "incorrect latitude ignored"),
    }
    match fields[7].parse::<f64>() {
        Ok(longitude) => airport.longitude = longitude,
        Err(_) => warn!(line = line_no, value = fields[7], "incorrect longitude ignored"),
    }
    Ok(airport)
}

/// Parse every non-blank line of a full airport file
pub fn read_airport_records<R: BufRead>(reader: R) -> crate::Result<Vec<AirportEntry>> {
    let mut airports = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        airports.push(parse_airport_record(&line, idx + 1)?);
    }
    Ok(airports)
}

fn parse_coordinate(value: &str, name: &str, line_no: usize) -> crate::Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| WeatherError::parse(line_no, format!("invalid {name} '{value}'")))
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"')
}
