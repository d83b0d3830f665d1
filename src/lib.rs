/*!
# Ridership Dashboard

A browser dashboard for transit-card (İzmirimKart) usage records, built in Rust.

## Overview

The service reads a spreadsheet with one row per date and institution and one
numeric column per passenger type, then serves a single page: a dropdown of
institutions and a line chart of the selected institution's passenger counts.
Picking another institution redraws the chart in place.

## Architecture

### Data Layer
- **loader** - Reads `.xlsx`/`.xls`/`.ods` workbooks (first sheet) and CSV files
- **dates** - Reads textual dates (month-first or day-first) as calendar dates
- **dataset** - The immutable table and its resolved column schema

### View Layer
- **selection** - One viewer's current institution, always a known value
- **chart** - Pure derivation of a Plotly figure from (dataset, institution)

### Web Layer (`web` feature)
- **app** - axum router, page rendering and the chart endpoint
- **config** - Command line and environment configuration

## Control Flow

1. The table is loaded once at startup. A missing or malformed file stops the
   process before any port is bound.
2. The page preselects the viewer's remembered institution (cookie) or the
   first institution of the table.
3. Every dropdown change requests `/api/chart?institution=NAME`; the server
   computes a fresh chart and the browser replaces the old one.

## REST API Endpoints

- `/` - Dashboard page
- `/api/chart?institution=NAME` - Chart (Plotly figure JSON) for one institution
*/

pub mod chart;
pub mod dataset;
pub mod dates;
pub mod loader;
pub mod selection;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;

pub use chart::{ChartSpec, ChartStyle};
pub use dataset::{Dataset, Record, Schema};
pub use loader::{LoadError, SchemaConfig, load_dataset};
pub use selection::Selection;
