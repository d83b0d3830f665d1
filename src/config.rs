use crate::chart::ChartStyle;
use crate::dates::DateOrder;
use crate::loader::SchemaConfig;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "İzmirimKart Verileri";
pub const DEFAULT_DESCRIPTION: &str = "Bu grafik, 1 Ocak 2021 ile 30 Ekim 2023 tarihleri arasında, \
     çeşitli kurumlardaki İzmirimKart kullanım verilerini göstermektedir. \
     En iyi deneyim için bilgisayardan incelenmesi önerilir.";

/// Command line of the `website` binary
#[derive(Parser, Debug)]
#[command(name = "website")]
#[command(about = "Serve the transit-card ridership dashboard")]
pub struct Args {
    /// Workbook (.xlsx, .xls, .ods) or CSV file with the ridership table
    #[arg(env = "DASHBOARD_DATA", default_value = "ulasim.xlsx")]
    pub data: PathBuf,

    /// Address to listen on
    #[arg(long, env = "DASHBOARD_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port for web server
    #[arg(short, long, env = "PORT", default_value_t = 8050)]
    pub port: u16,

    /// Header of the date column
    #[arg(long, default_value = "Tarih")]
    pub date_column: String,

    /// Header of the institution column
    #[arg(long, default_value = "Kurum")]
    pub institution_column: String,

    /// Passenger-count columns to plot, in order. Comma separated or repeated.
    /// When omitted, every column after the leading identifier columns is used.
    #[arg(long, value_delimiter = ',')]
    pub series: Vec<String>,

    /// Number of identifier columns at the start of the header row
    #[arg(long, default_value_t = 3)]
    pub leading_columns: usize,

    /// Read ambiguous textual dates such as 03/04/2021 as day/month
    /// (default is month/day)
    #[arg(long)]
    pub day_first: bool,

    /// Page heading
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Text shown under the heading
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,

    /// Title of the date axis
    #[arg(long, default_value = "Tarih")]
    pub x_label: String,

    /// Title of the count axis
    #[arg(long, default_value = "Toplam Yolcu Sayısı")]
    pub y_label: String,
}

/// Static text of the dashboard page
#[derive(Clone, Debug)]
pub struct PageConfig {
    pub title: String,
    pub description: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Resolved settings for one server process
#[derive(Clone, Debug)]
pub struct Config {
    pub data: PathBuf,
    pub addr: SocketAddr,
    pub schema: SchemaConfig,
    pub page: PageConfig,
    pub style: ChartStyle,
}

impl Config {
    /// Parse the process arguments, exiting with usage on error
    pub fn from_args() -> Self {
        Args::parse().into()
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            data: args.data,
            addr: SocketAddr::new(args.host, args.port),
            schema: SchemaConfig {
                date_column: args.date_column,
                institution_column: args.institution_column,
                series: args
                    .series
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                leading_columns: args.leading_columns,
                date_order: if args.day_first {
                    DateOrder::DayFirst
                } else {
                    DateOrder::MonthFirst
                },
            },
            page: PageConfig {
                title: args.title,
                description: args.description,
            },
            style: ChartStyle {
                x_label: args.x_label,
                y_label: args.y_label,
            },
        }
    }
}
