mod load;
mod record;

pub use load::{load_dataset, Dataset, Problem as LoadProblem};
pub use record::{parse_list, parse_years, wiki_title_from_url, ArtistRecord, UNKNOWN_GENRE};
