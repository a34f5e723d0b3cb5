use clap::{Parser, Subcommand};

use crate::board::LayoutPolicy;

/// Tracks people, their category and their votes, and lays them out as bubbles.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file with the categories, the data file and the
    /// layout options. See the manual for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The CSV data file. Setting this option overrides the path that may be
    /// specified with the --config option. Defaults to progreso.csv.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Adds a person to the board.
    Add {
        /// The name of the person. It does not need to be unique.
        #[clap(short, long, value_parser)]
        name: String,
        /// One of the configured categories.
        #[clap(long, value_parser)]
        category: String,
        /// (default 0) The initial number of votes.
        #[clap(long, value_parser, default_value_t = 0)]
        votes: u64,
        /// (URL, optional) A link to a picture. It is not checked.
        #[clap(long, value_parser)]
        image_url: Option<String>,
        /// (file path, optional) A picture to upload. It is cropped to a circle and stored in the data
        /// file. If it cannot be read, --image-url is used instead.
        #[clap(long, value_parser)]
        image_file: Option<String>,
    },
    /// Sets the number of votes of a person.
    Update {
        #[clap(short, long, value_parser)]
        name: String,
        /// (optional) Only update the person in this category. Without it, every person with
        /// this name is updated (unless the configuration requires unique names).
        #[clap(long, value_parser)]
        category: Option<String>,
        #[clap(long, value_parser)]
        votes: u64,
    },
    /// Removes everybody from the board. This cannot be undone.
    Reset,
    /// The votes per category.
    Summary {
        /// (default scatter) How to place the category bubbles.
        #[clap(long, value_enum)]
        layout: Option<LayoutPolicy>,
    },
    /// The people of one category.
    Show {
        #[clap(long, value_parser)]
        category: String,
        /// (default radial) How to place the bubbles of the people.
        #[clap(long, value_enum)]
        layout: Option<LayoutPolicy>,
    },
    /// Everybody on the board, in order.
    List,
}
