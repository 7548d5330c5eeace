// Example: compose a feed out of three differently-styled sections and
// apply a mutation batch.
use std::sync::Arc;

use sectional::{
    Composition, Dimension, FitMode, IndexPath, Insets, LayoutProvider, Rows, Size, Snap, Style,
    Update,
};

fn main() {
    let provider = LayoutProvider::new()
        .with_style(|section: &&str, _width| match *section {
            "stories" => Some(Style::horizontal(
                Insets::all(8.0),
                12.0,
                Rows::Infinite {
                    snap: Snap::Centered,
                },
                |_item: &String| Some(Size::new(72.0, 72.0)),
            )),
            "photos" => Some(Style::grid(
                Insets::all(4.0),
                FitMode::Automatic {
                    min_spacing: 8.0,
                    indent: Dimension::Automatic,
                },
                |_item| Some(Size::new(100.0, 100.0)),
            )),
            _ => Some(Style::vertical(|_item| Some(Dimension::Automatic))),
        })
        .with_header(|_section, _width| Some(Dimension::Absolute(28.0)));

    let mut feed: Composition<&str, String> = Composition::with_provider(provider);
    feed.set_width(375.0);

    let deltas = feed.batch([Update::SetSections {
        sections: vec!["stories", "photos", "posts"],
        items: Some(Arc::new(|section| {
            let prefix = *section;
            Some((0..8).map(|i| format!("{prefix}-{i}")).collect())
        })),
    }]);
    println!("initial deltas: {deltas:?}");

    println!("photos height: {}", feed.height_of_section(&"photos"));
    println!("photos fit: {:?}", feed.grid_fit_of_section(&"photos"));
    println!("stories rows: {}", feed.virtual_row_count(&"stories"));

    // A post renders, reports its measured height, and the row resolves.
    let post = "posts-0".to_string();
    println!("post row before: {:?}", feed.row_height(IndexPath::new(2, 0)));
    feed.report_measured(142.0, &post, &"posts");
    println!("post row after: {:?}", feed.row_height(IndexPath::new(2, 0)));

    // Appending invalidates the section; the delta addresses the outer
    // list because "posts" is vertical.
    let deltas = feed.batch([Update::AppendItems {
        items: vec!["posts-8".to_string()],
        section: "posts",
    }]);
    println!("append deltas: {deltas:?}");
}
