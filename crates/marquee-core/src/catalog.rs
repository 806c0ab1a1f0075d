use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::layout::{HallLayout, SeatIndex};

/// A film in the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Movie {
    pub id: u32,
    pub title: String,
    /// Ticket price in integer cents.
    pub price_cents: u32,
    /// Short blurb shown while browsing.
    #[serde(default)]
    pub synopsis: String,
    /// Searchable tags (genre, mood, language, etc.)
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A scheduled screening with its own seat occupancy.
/// `occupied` is mutated in place when a booking lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    pub id: u32,
    pub movie_id: u32,
    pub starts_at: NaiveTime,
    pub occupied: BTreeSet<SeatIndex>,
}

impl Showtime {
    pub fn free_seats(&self, layout: &HallLayout) -> u16 {
        layout.total().saturating_sub(self.occupied.len() as u16)
    }

    pub fn is_full(&self, layout: &HallLayout) -> bool {
        self.free_seats(layout) == 0
    }
}

/// Format integer cents as dollars: 1050 -> "$10.50".
pub fn format_cents(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate movie id {0}")]
    DuplicateMovie(u32),
    #[error("duplicate showtime id {0}")]
    DuplicateShowtime(u32),
    #[error("showtime {showtime} references unknown movie {movie_id}")]
    UnknownMovie { showtime: u32, movie_id: u32 },
    #[error("showtime {showtime} marks seat {seat} outside the {total}-seat hall")]
    SeatOutOfRange {
        showtime: u32,
        seat: SeatIndex,
        total: u16,
    },
}

/// The full movie/showtime catalog, owned by the booking session.
/// No global state: whoever constructs the session passes this in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    pub showtimes: Vec<Showtime>,
}

impl Catalog {
    pub fn movie(&self, id: u32) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn showtime(&self, id: u32) -> Option<&Showtime> {
        self.showtimes.iter().find(|s| s.id == id)
    }

    pub fn showtime_mut(&mut self, id: u32) -> Option<&mut Showtime> {
        self.showtimes.iter_mut().find(|s| s.id == id)
    }

    /// Showtimes for a movie, ordered by start time (id as tiebreak).
    pub fn showtimes_for(&self, movie_id: u32) -> Vec<&Showtime> {
        let mut shows: Vec<&Showtime> = self
            .showtimes
            .iter()
            .filter(|s| s.movie_id == movie_id)
            .collect();
        shows.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        shows
    }

    /// The showtime a movie opens on when selected: earliest start time.
    pub fn first_showtime_for(&self, movie_id: u32) -> Option<u32> {
        self.showtimes_for(movie_id).first().map(|s| s.id)
    }

    /// Load-time integrity checks. Runtime operations assume a valid catalog
    /// and stay total, so everything suspect must be rejected here.
    pub fn validate(&self, layout: &HallLayout) -> Result<(), CatalogError> {
        let mut movie_ids = BTreeSet::new();
        for movie in &self.movies {
            if !movie_ids.insert(movie.id) {
                return Err(CatalogError::DuplicateMovie(movie.id));
            }
        }

        let mut showtime_ids = BTreeSet::new();
        for show in &self.showtimes {
            if !showtime_ids.insert(show.id) {
                return Err(CatalogError::DuplicateShowtime(show.id));
            }
            if !movie_ids.contains(&show.movie_id) {
                return Err(CatalogError::UnknownMovie {
                    showtime: show.id,
                    movie_id: show.movie_id,
                });
            }
            for &seat in &show.occupied {
                if !layout.contains(seat) {
                    return Err(CatalogError::SeatOutOfRange {
                        showtime: show.id,
                        seat,
                        total: layout.total(),
                    });
                }
            }
        }

        Ok(())
    }

    /// The built-in demo catalog (sized for the default 4×8 hall).
    pub fn demo() -> Self {
        fn movie(id: u32, title: &str, price_cents: u32, synopsis: &str, tags: &[&str]) -> Movie {
            Movie {
                id,
                title: title.to_string(),
                price_cents,
                synopsis: synopsis.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }
        }

        fn show(id: u32, movie_id: u32, hhmm: (u32, u32), occupied: &[SeatIndex]) -> Showtime {
            Showtime {
                id,
                movie_id,
                starts_at: NaiveTime::from_hms_opt(hhmm.0, hhmm.1, 0)
                    .unwrap_or(NaiveTime::MIN),
                occupied: occupied.iter().copied().collect(),
            }
        }

        Self {
            movies: vec![
                movie(
                    1,
                    "Signal and Noise",
                    1000,
                    "A radio astronomer hears a pattern that should not exist.",
                    &["sci-fi", "thriller"],
                ),
                movie(
                    2,
                    "The Paper Moon",
                    850,
                    "Two counterfeiters take one last job in a coastal town.",
                    &["drama"],
                ),
                movie(
                    3,
                    "Midnight Circuit",
                    1200,
                    "Street racers, and the detective who used to be one.",
                    &["action"],
                ),
            ],
            showtimes: vec![
                show(1, 1, (15, 0), &[5, 6, 15, 16]),
                show(2, 1, (18, 30), &[3, 4, 20, 21, 22]),
                show(3, 1, (21, 15), &[]),
                show(4, 2, (17, 45), &[1, 2, 9, 10, 17]),
                show(5, 2, (20, 30), &[12, 13]),
                show(6, 3, (19, 0), &[7, 8, 14, 23, 24, 30, 31, 32]),
                // Sold out: exercises the FULL badge and occupied no-ops.
                show(
                    7,
                    3,
                    (23, 45),
                    &(1..=32).collect::<Vec<SeatIndex>>(),
                ),
            ],
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        let file = TomlCatalogFile::from(self);
        Ok(toml::to_string_pretty(&file)?)
    }
}

// ── TOML catalog loader ───────────────────────────────────────────────────────

/// Intermediate structs matching the TOML `[[movie]]` / `[[showtime]]` tables.
/// Kept separate from the runtime structs so the file schema can diverge from
/// them without breaking either (`starts_at` is a plain "HH:MM" string here).
#[derive(Debug, Serialize, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    movie: Vec<TomlMovie>,
    #[serde(default)]
    showtime: Vec<TomlShowtime>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlMovie {
    id: u32,
    title: String,
    price_cents: u32,
    #[serde(default)]
    synopsis: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlShowtime {
    id: u32,
    movie_id: u32,
    /// Start time as "HH:MM" (24-hour).
    starts_at: String,
    #[serde(default)]
    occupied: Vec<SeatIndex>,
}

impl From<&Catalog> for TomlCatalogFile {
    fn from(catalog: &Catalog) -> Self {
        Self {
            movie: catalog
                .movies
                .iter()
                .map(|m| TomlMovie {
                    id: m.id,
                    title: m.title.clone(),
                    price_cents: m.price_cents,
                    synopsis: m.synopsis.clone(),
                    tags: m.tags.clone(),
                })
                .collect(),
            showtime: catalog
                .showtimes
                .iter()
                .map(|s| TomlShowtime {
                    id: s.id,
                    movie_id: s.movie_id,
                    starts_at: s.starts_at.format("%H:%M").to_string(),
                    occupied: s.occupied.iter().copied().collect(),
                })
                .collect(),
        }
    }
}

pub fn parse_catalog_from_toml_str(content: &str) -> anyhow::Result<Catalog> {
    let file: TomlCatalogFile = toml::from_str(content)?;

    let movies = file
        .movie
        .into_iter()
        .map(|m| Movie {
            id: m.id,
            title: m.title,
            price_cents: m.price_cents,
            synopsis: m.synopsis,
            tags: m.tags,
        })
        .collect();

    let showtimes = file
        .showtime
        .into_iter()
        .map(|s| {
            let starts_at = NaiveTime::parse_from_str(&s.starts_at, "%H:%M")
                .map_err(|e| anyhow::anyhow!("showtime {}: bad starts_at {:?}: {}", s.id, s.starts_at, e))?;
            Ok(Showtime {
                id: s.id,
                movie_id: s.movie_id,
                starts_at,
                occupied: s.occupied.into_iter().collect(),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Catalog { movies, showtimes })
}

pub fn load_catalog_from_toml(path: &std::path::Path) -> anyhow::Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_from_toml_str(&content)
}

/// Load the catalog file, seeding it with the demo catalog on first run.
/// Validates against the hall layout either way.
pub fn load_or_seed(path: &std::path::Path, layout: &HallLayout) -> anyhow::Result<Catalog> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Catalog::demo().to_toml_string()?)?;
        info!("seeded demo catalog at {}", path.display());
    }

    let catalog = load_catalog_from_toml(path)?;
    catalog.validate(layout)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_toml() {
        let content = r#"
            [[movie]]
            id = 1
            title = "Signal and Noise"
            price_cents = 1000
            tags = ["sci-fi"]

            [[showtime]]
            id = 10
            movie_id = 1
            starts_at = "18:30"
            occupied = [3, 7]
        "#;
        let catalog = parse_catalog_from_toml_str(content).unwrap();
        assert_eq!(catalog.movies.len(), 1);
        assert_eq!(catalog.movie(1).unwrap().price_cents, 1000);
        let show = catalog.showtime(10).unwrap();
        assert_eq!(show.starts_at, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert!(show.occupied.contains(&3) && show.occupied.contains(&7));
    }

    #[test]
    fn test_parse_rejects_bad_time() {
        let content = r#"
            [[movie]]
            id = 1
            title = "x"
            price_cents = 100

            [[showtime]]
            id = 10
            movie_id = 1
            starts_at = "25:99"
        "#;
        assert!(parse_catalog_from_toml_str(content).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let demo = Catalog::demo();
        let toml = demo.to_toml_string().unwrap();
        let parsed = parse_catalog_from_toml_str(&toml).unwrap();
        assert_eq!(parsed.movies.len(), demo.movies.len());
        assert_eq!(parsed.showtimes.len(), demo.showtimes.len());
        assert_eq!(
            parsed.showtime(2).unwrap().occupied,
            demo.showtime(2).unwrap().occupied
        );
    }

    #[test]
    fn test_demo_catalog_valid() {
        let catalog = Catalog::demo();
        assert!(catalog.validate(&HallLayout::default()).is_ok());
        // Every movie screens at least once.
        for movie in &catalog.movies {
            assert!(!catalog.showtimes_for(movie.id).is_empty());
        }
    }

    #[test]
    fn test_validate_rejects_dangling_movie() {
        let mut catalog = Catalog::demo();
        catalog.showtimes[0].movie_id = 999;
        assert_eq!(
            catalog.validate(&HallLayout::default()),
            Err(CatalogError::UnknownMovie {
                showtime: 1,
                movie_id: 999
            })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_seat() {
        let mut catalog = Catalog::demo();
        catalog.showtimes[0].occupied.insert(33);
        assert_eq!(
            catalog.validate(&HallLayout::default()),
            Err(CatalogError::SeatOutOfRange {
                showtime: 1,
                seat: 33,
                total: 32
            })
        );
    }

    #[test]
    fn test_showtimes_sorted_by_start() {
        let catalog = Catalog::demo();
        let shows = catalog.showtimes_for(1);
        let times: Vec<NaiveTime> = shows.iter().map(|s| s.starts_at).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
        assert_eq!(catalog.first_showtime_for(1), Some(1));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1000), "$10.00");
        assert_eq!(format_cents(850), "$8.50");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(0), "$0.00");
    }
}
