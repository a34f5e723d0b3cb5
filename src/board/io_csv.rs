// The data file: a CSV file with a fixed header, rewritten in full on save.

use std::fs::File;
use std::io::ErrorKind;

use csv::{ReaderBuilder, StringRecord, Trim};
use tempfile::NamedTempFile;

use crate::board::*;

pub const HEADER: [&str; 4] = ["Persona", "Categoria", "Votos", "Imagen"];

/// A record store backed by one CSV file.
///
/// A missing file is an empty collection. Any other problem while reading is
/// an error, never an empty collection.
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: PathBuf) -> CsvFileStore {
        CsvFileStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads a vote count. Integral floats such as `5.0` are accepted, since
/// some spreadsheet tools write integers that way.
fn parse_votes(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
        _ => None,
    }
}

fn read_person(record: &StringRecord, path: &str, lineno: u64) -> BoardResult<Person> {
    // The reader rejects rows with a different number of fields than the header.
    let name = record.get(0).unwrap_or_default();
    let category = record.get(1).unwrap_or_default();
    let votes_s = record.get(2).unwrap_or_default();
    let image = record.get(3).unwrap_or_default();

    let votes = parse_votes(votes_s).context(InvalidVotesSnafu {
        path,
        lineno,
        content: votes_s,
    })?;
    if name.trim().is_empty() {
        warn!("read_person: line {} of {} has no name", lineno, path);
    }
    Ok(Person::new(name, category, votes).with_image(Some(image.to_string())))
}

impl RecordStore for CsvFileStore {
    type Error = BoardError;

    fn load(&self) -> BoardResult<RecordCollection> {
        let path = self.display_path();
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("load: no data file at {:?}, starting empty", path);
                return Ok(RecordCollection::new());
            }
            Err(e) => return Err(e).context(OpeningDataSnafu { path }),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(file);
        let header: Vec<String> = rdr
            .headers()
            .context(CsvLineParseSnafu {
                path: path.clone(),
                lineno: 1u64,
            })?
            .iter()
            .map(|s| s.to_string())
            .collect();
        ensure!(
            header == HEADER,
            WrongHeaderSnafu {
                path: path.clone(),
                found: header.clone()
            }
        );

        let mut people: Vec<Person> = Vec::new();
        for (idx, line_r) in rdr.records().enumerate() {
            // The header is line 1.
            let lineno = (idx + 2) as u64;
            let line = line_r.context(CsvLineParseSnafu {
                path: path.clone(),
                lineno,
            })?;
            debug!("load: lineno: {:?} row: {:?}", lineno, line);
            people.push(read_person(&line, &path, lineno)?);
        }
        info!("load: {} people read from {}", people.len(), path);
        Ok(RecordCollection::from_people(people))
    }

    fn save(&self, coll: &RecordCollection) -> BoardResult<()> {
        let path = self.display_path();
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        // Written next to the target and renamed over it, so that readers
        // never see a partial file.
        let tmp = NamedTempFile::new_in(dir).context(WritingDataSnafu { path: path.clone() })?;
        {
            let mut wtr = csv::Writer::from_writer(tmp.as_file());
            wtr.write_record(HEADER)
                .context(WritingCsvSnafu { path: path.clone() })?;
            for p in coll.iter() {
                let votes = p.votes.to_string();
                wtr.write_record([
                    p.name.as_str(),
                    p.category.as_str(),
                    votes.as_str(),
                    p.image.as_deref().unwrap_or(""),
                ])
                .context(WritingCsvSnafu { path: path.clone() })?;
            }
            wtr.flush().context(WritingDataSnafu { path: path.clone() })?;
        }
        tmp.persist(&self.path)
            .context(PersistingDataSnafu { path: path.clone() })?;
        info!("save: {} people written to {}", coll.len(), path);
        Ok(())
    }
}
