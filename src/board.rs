use log::{debug, info, warn};

use bubble_tally::*;
use snafu::{prelude::*, Snafu};

use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

pub mod config_reader;
pub mod io_csv;
pub mod io_image;

use crate::board::config_reader::*;
use crate::board::io_image::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BoardError {
    #[snafu(display("Error opening data file {path}"))]
    OpeningData {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Unexpected header in {path}: {found:?}"))]
    WrongHeader { path: String, found: Vec<String> },
    #[snafu(display("Invalid vote count {content:?} at line {lineno} of {path}"))]
    InvalidVotes {
        path: String,
        lineno: u64,
        content: String,
    },
    #[snafu(display("Error writing data file {path}"))]
    WritingData {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing record to {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error replacing data file {path}"))]
    PersistingData {
        source: tempfile::PersistError,
        path: String,
    },
    #[snafu(display("Error opening image {path}"))]
    OpeningImage {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not decode the uploaded image"))]
    ImageDecode { source: image::ImageError },
    #[snafu(display("Could not encode the image"))]
    ImageEncode { source: image::ImageError },
    #[snafu(display("Error opening configuration {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error rendering the report"))]
    RenderingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl From<Infallible> for BoardError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// How to place the bubbles.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Seeded random positions.
    Scatter,
    /// Evenly spaced around the center, sized by votes.
    Radial,
}

/// A request to add one person.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AddRequest {
    pub name: String,
    pub category: String,
    pub votes: u64,
    pub image_url: Option<String>,
    /// A picture to upload. It takes precedence over the URL when it can be
    /// decoded.
    pub image_file: Option<PathBuf>,
}

fn geometry_js(g: &Geometry) -> JSValue {
    json!({"x": g.x, "y": g.y, "size": g.size})
}

fn person_js(p: &Person) -> JSMap<String, JSValue> {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    m.insert("name".to_string(), json!(p.name));
    m.insert("category".to_string(), json!(p.category));
    m.insert("votes".to_string(), json!(p.votes));
    m.insert("image".to_string(), json!(p.image));
    m
}

fn ok_js(message: String) -> JSValue {
    json!({"status": "ok", "message": message})
}

// Validation failures are rejections, a missing person is only a warning.
fn rejection_js(e: &TallyError) -> JSValue {
    let status = match e {
        TallyError::NotFound { .. } => "warning",
        _ => "rejected",
    };
    json!({"status": status, "message": e.to_string()})
}

/// The board: one store and its settings.
///
/// Every public method is one interaction cycle. It loads the whole
/// collection, computes, saves when something changed and returns a report.
/// A rejected request returns a report and never writes to the store.
pub struct Board<S> {
    settings: BoardSettings,
    store: S,
}

impl<S> Board<S>
where
    S: RecordStore,
    BoardError: From<S::Error>,
{
    pub fn new(settings: BoardSettings, store: S) -> Board<S> {
        Board { settings, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add(&self, request: &AddRequest) -> BoardResult<JSValue> {
        let mut coll = self.store.load()?;
        let (image, image_warning) = self.resolve_image(request);
        let person =
            Person::new(&request.name, &request.category, request.votes).with_image(image);
        if let Err(e) = coll.add(person, &self.settings.categories) {
            info!("add: rejected: {}", e);
            return Ok(rejection_js(&e));
        }
        self.store.save(&coll)?;

        let mut js = ok_js(format!(
            "{} added to {}",
            request.name, request.category
        ));
        js["count"] = json!(coll.len());
        if let Some(w) = image_warning {
            js["imageWarning"] = json!(w);
        }
        Ok(js)
    }

    // An upload that cannot be used falls back to the URL, or to no image.
    fn resolve_image(&self, request: &AddRequest) -> (Option<String>, Option<String>) {
        let url = request.image_url.clone().filter(|s| !s.is_empty());
        match request.image_file.as_deref().map(read_upload) {
            Some(Ok(img)) => (Some(img.to_string()), None),
            Some(Err(e)) => {
                warn!("add: ignoring uploaded image: {}", e);
                (url, Some(e.to_string()))
            }
            None => (url, None),
        }
    }

    pub fn update_votes(
        &self,
        name: &str,
        category: Option<&str>,
        votes: u64,
    ) -> BoardResult<JSValue> {
        let mut coll = self.store.load()?;
        let updated =
            match coll.update_votes(name, category, votes, self.settings.duplicate_name_mode) {
                Ok(n) => n,
                Err(e) => {
                    info!("update_votes: rejected: {}", e);
                    return Ok(rejection_js(&e));
                }
            };
        self.store.save(&coll)?;

        let mut js = ok_js(format!("votes updated for {}", name));
        js["updated"] = json!(updated);
        Ok(js)
    }

    /// Discards every record. The current content is not read, so this also
    /// recovers from a data file that cannot be parsed.
    pub fn reset(&self) -> BoardResult<JSValue> {
        let coll = self.store.reset()?;
        info!("reset: the board is now empty");
        let mut js = ok_js("all values reset".to_string());
        js["count"] = json!(coll.len());
        Ok(js)
    }

    fn layout(
        &self,
        votes: &[u64],
        policy: LayoutPolicy,
        scatter_settings: &ScatterSettings,
    ) -> Vec<Geometry> {
        match policy {
            LayoutPolicy::Scatter => scatter(votes, scatter_settings),
            LayoutPolicy::Radial => radial(votes, &self.settings.radial),
        }
    }

    /// The vote totals per category, with their color and bubble.
    pub fn summary(&self, policy: LayoutPolicy) -> BoardResult<JSValue> {
        let coll = self.store.load()?;
        let totals = sum_by_category(&coll, &self.settings.categories);
        let votes: Vec<u64> = totals.iter().map(|c| c.votes).collect();
        let geometry = self.layout(&votes, policy, &self.settings.category_scatter);
        debug!("summary: totals: {:?}", totals);

        let categories: Vec<JSValue> = totals
            .iter()
            .zip(geometry.iter())
            .enumerate()
            .map(|(idx, (total, g))| {
                let color = self
                    .settings
                    .categories
                    .color(&total.category)
                    .unwrap_or_else(|| palette_color(idx));
                json!({
                    "category": total.category,
                    "votes": total.votes,
                    "color": color,
                    "bubble": geometry_js(g),
                })
            })
            .collect();

        let mut js = ok_js(format!("{} categories", categories.len()));
        js["layout"] = json!(policy);
        js["totalVotes"] = json!(total_votes(&coll));
        js["categories"] = JSValue::Array(categories);
        Ok(js)
    }

    /// The people of one category, in file order, with their bubble.
    ///
    /// Each distinct name gets its own palette color, in order of first
    /// appearance, so homonyms share a color.
    pub fn show(&self, category: &str, policy: LayoutPolicy) -> BoardResult<JSValue> {
        let coll = self.store.load()?;
        let members = filter_by_category(&coll, category);
        let votes: Vec<u64> = members.iter().map(|p| p.votes).collect();
        let geometry = self.layout(&votes, policy, &self.settings.person_scatter);
        let mut names: Vec<&str> = Vec::new();
        for p in members.iter() {
            if !names.contains(&p.name.as_str()) {
                names.push(p.name.as_str());
            }
        }

        let people: Vec<JSValue> = members
            .iter()
            .zip(geometry.iter())
            .map(|(p, g)| {
                let idx = names.iter().position(|n| *n == p.name).unwrap_or(0);
                let mut m = person_js(p);
                m.insert("color".to_string(), json!(palette_color(idx)));
                m.insert("bubble".to_string(), geometry_js(g));
                JSValue::Object(m)
            })
            .collect();

        let message = if people.is_empty() {
            "no people in this category yet".to_string()
        } else {
            format!("{} people in {}", people.len(), category)
        };
        let mut js = ok_js(message);
        js["category"] = json!(category);
        js["color"] = json!(self.settings.categories.color(category));
        js["layout"] = json!(policy);
        js["people"] = JSValue::Array(people);
        Ok(js)
    }

    pub fn list(&self) -> BoardResult<JSValue> {
        let coll = self.store.load()?;
        let people: Vec<JSValue> = coll
            .iter()
            .map(|p| JSValue::Object(person_js(p)))
            .collect();
        let mut js = ok_js(format!("{} people", coll.len()));
        js["names"] = json!(coll.distinct_names());
        js["people"] = JSValue::Array(people);
        Ok(js)
    }
}

fn read_upload(path: &Path) -> BoardResult<InlineImage> {
    let bytes = fs::read(path).context(OpeningImageSnafu {
        path: path.display().to_string(),
    })?;
    debug!("read_upload: {} bytes from {:?}", bytes.len(), path);
    normalize(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::io_csv::CsvFileStore;
    use std::io::Write;

    fn memory_board() -> Board<MemoryStore> {
        Board::new(BoardSettings::default(), MemoryStore::new())
    }

    fn add_request(name: &str, category: &str, votes: u64) -> AddRequest {
        AddRequest {
            name: name.to_string(),
            category: category.to_string(),
            votes,
            image_url: None,
            image_file: None,
        }
    }

    #[test]
    fn add_then_list() {
        let board = memory_board();
        let js = board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        assert_eq!(js["status"], "ok");
        assert_eq!(js["message"], "Ana added to Categoria 1");
        let js = board.list().unwrap();
        assert_eq!(js["people"][0]["name"], "Ana");
        assert_eq!(js["people"][0]["votes"], 3);
        assert_eq!(js["people"][0]["image"], JSValue::Null);
    }

    #[test]
    fn empty_name_is_rejected_without_writing() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        let before = board.store().load().unwrap();
        let js = board.add(&add_request("", "Categoria 1", 3)).unwrap();
        assert_eq!(js["status"], "rejected");
        assert_eq!(board.store().load().unwrap().len(), before.len());
    }

    #[test]
    fn nothing_is_saved_when_the_first_add_is_rejected() {
        let board = memory_board();
        let js = board.add(&add_request("Ana", "Nope", 3)).unwrap();
        assert_eq!(js["status"], "rejected");
        assert!(!board.store().is_persisted());
    }

    #[test]
    fn update_reaches_every_homonym() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        board.add(&add_request("Ana", "Categoria 2", 1)).unwrap();
        let js = board.update_votes("Ana", None, 7).unwrap();
        assert_eq!(js["updated"], 2);
        let coll = board.store().load().unwrap();
        assert!(coll.iter().all(|p| p.votes == 7));
    }

    #[test]
    fn update_unknown_name_is_a_warning() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        let js = board.update_votes("Pedro", None, 7).unwrap();
        assert_eq!(js["status"], "warning");
    }

    #[test]
    fn update_requiring_unique_name() {
        let settings = BoardSettings {
            duplicate_name_mode: DuplicateNameMode::RequireUnique,
            ..BoardSettings::default()
        };
        let board = Board::new(settings, MemoryStore::new());
        board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        board.add(&add_request("Ana", "Categoria 2", 1)).unwrap();
        let js = board.update_votes("Ana", None, 7).unwrap();
        assert_eq!(js["status"], "rejected");
        let js = board.update_votes("Ana", Some("Categoria 2"), 7).unwrap();
        assert_eq!(js["status"], "ok");
        let votes: Vec<u64> = board.store().load().unwrap().iter().map(|p| p.votes).collect();
        assert_eq!(votes, vec![3, 7]);
    }

    #[test]
    fn summary_totals_and_colors() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 2", 3)).unwrap();
        board.add(&add_request("Luis", "Categoria 1", 5)).unwrap();
        board.add(&add_request("Marta", "Categoria 2", 4)).unwrap();
        let js = board.summary(LayoutPolicy::Scatter).unwrap();
        assert_eq!(js["totalVotes"], 12);
        assert_eq!(js["layout"], "scatter");
        assert_eq!(js["categories"][0]["category"], "Categoria 1");
        assert_eq!(js["categories"][0]["votes"], 5);
        assert_eq!(js["categories"][0]["color"], "#636EFA");
        assert_eq!(js["categories"][1]["category"], "Categoria 2");
        assert_eq!(js["categories"][1]["votes"], 7);
        assert_eq!(js["categories"][1]["color"], "#EF553B");
        assert_eq!(js["categories"][1]["bubble"]["size"], 100.0);
    }

    #[test]
    fn summary_with_huge_counts() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 1", u64::MAX)).unwrap();
        board.add(&add_request("Luis", "Categoria 1", u64::MAX)).unwrap();
        let js = board.summary(LayoutPolicy::Scatter).unwrap();
        assert_eq!(js["totalVotes"], u64::MAX);
        assert_eq!(js["categories"][0]["votes"], u64::MAX);
        assert_eq!(js["categories"][0]["bubble"]["size"], 100.0);
    }

    #[test]
    fn show_colors_each_name() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        board.add(&add_request("Luis", "Categoria 2", 1)).unwrap();
        board.add(&add_request("Marta", "Categoria 1", 4)).unwrap();
        board.add(&add_request("Ana", "Categoria 1", 2)).unwrap();
        let js = board.show("Categoria 1", LayoutPolicy::Radial).unwrap();
        let colors: Vec<&str> = js["people"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["color"].as_str().unwrap())
            .collect();
        assert_eq!(colors, vec!["#636EFA", "#EF553B", "#636EFA"]);
        assert_eq!(js["color"], "#636EFA");
    }

    #[test]
    fn show_radial_and_empty_category() {
        let board = memory_board();
        board.add(&add_request("Ana", "Categoria 1", 3)).unwrap();
        let js = board.show("Categoria 1", LayoutPolicy::Radial).unwrap();
        assert_eq!(js["people"][0]["bubble"]["y"], 0.5);
        let js = board.show("Categoria 4", LayoutPolicy::Radial).unwrap();
        assert_eq!(js["status"], "ok");
        assert_eq!(js["message"], "no people in this category yet");
        assert_eq!(js["people"].as_array().map(|a| a.len()), Some(0));
    }

    #[test]
    fn undecodable_upload_falls_back_to_url() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.png");
        fs::File::create(&bad)
            .unwrap()
            .write_all(b"definitely not a picture")
            .unwrap();
        let board = memory_board();
        let request = AddRequest {
            image_url: Some("https://example.com/ana.png".to_string()),
            image_file: Some(bad),
            ..add_request("Ana", "Categoria 1", 3)
        };
        let js = board.add(&request).unwrap();
        assert_eq!(js["status"], "ok");
        assert!(js["imageWarning"].is_string());
        let coll = board.store().load().unwrap();
        assert_eq!(
            coll.people()[0].image.as_deref(),
            Some("https://example.com/ana.png")
        );
    }

    #[test]
    fn uploaded_image_is_stored_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ana.png");
        image::RgbaImage::from_pixel(12, 8, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let board = memory_board();
        let request = AddRequest {
            image_file: Some(path),
            ..add_request("Ana", "Categoria 1", 3)
        };
        board.add(&request).unwrap();
        let coll = board.store().load().unwrap();
        let image = coll.people()[0].image.clone().unwrap();
        assert!(image.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn corrupt_file_is_fatal_but_reset_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progreso.csv");
        fs::write(&path, "Persona,Categoria,Votos,Imagen\nAna,Categoria 1,many,\n").unwrap();
        let board = Board::new(BoardSettings::default(), CsvFileStore::new(path));
        assert!(board.summary(LayoutPolicy::Scatter).is_err());
        assert!(board.add(&add_request("Luis", "Categoria 1", 1)).is_err());

        board.reset().unwrap();
        let js = board.list().unwrap();
        assert_eq!(js["people"].as_array().map(|a| a.len()), Some(0));
    }
}
