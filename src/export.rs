use crate::coords;
use crate::error;

/// One exported row in long format.
#[derive(Debug, serde::Serialize)]
struct PlotRow<'a> {
    band: &'a str,
    x: f64,
    y: Option<f64>,
}

/// Writes every plotted series as `band,x,y` rows; `y` is left empty where
/// the point has no value.
///
/// # Arguments
/// * `plot` - Plot-space data produced by `coords::plot_data`.
/// * `writer` - Destination for the CSV text.
///
/// # Returns
/// * `error::Result<usize>` - Number of data rows written.
pub fn write_plot<W: std::io::Write>(plot: &coords::PlotData, writer: W) -> error::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for series in &plot.series {
        for point in &series.points {
            csv_writer.serialize(PlotRow {
                band: series.kind.id(),
                x: point.x,
                y: point.y,
            })?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    Ok(rows)
}

/// One axis annotation row: a tick value, or a halving epoch span.
#[derive(Debug, serde::Serialize)]
struct AxisRow<'a> {
    kind: &'a str,
    index: usize,
    start: f64,
    end: Option<f64>,
}

/// Writes the axis annotations of a plot as `kind,index,start,end` rows.
///
/// `x_tick` and `y_tick` rows carry the tick position and its order in
/// `start`; `epoch` rows carry the halving epoch number and its clipped
/// X range.
///
/// # Returns
/// * `error::Result<usize>` - Number of data rows written.
pub fn write_axes<W: std::io::Write>(plot: &coords::PlotData, writer: W) -> error::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let ticks = plot
        .x_ticks
        .iter()
        .enumerate()
        .map(|(index, x)| AxisRow { kind: "x_tick", index, start: *x, end: None })
        .chain(
            plot.y_ticks
                .iter()
                .enumerate()
                .map(|(index, y)| AxisRow { kind: "y_tick", index, start: *y, end: None }),
        );
    let epochs = plot.epochs.iter().map(|e| AxisRow {
        kind: "epoch",
        index: e.epoch,
        start: e.start_x,
        end: Some(e.end_x),
    });

    let mut rows = 0;
    for row in ticks.chain(epochs) {
        csv_writer.serialize(row)?;
        rows += 1;
    }
    csv_writer.flush()?;
    Ok(rows)
}

/// Writes [`write_axes`] output to a file.
pub fn write_axes_csv<P: AsRef<std::path::Path>>(plot: &coords::PlotData, path: P) -> error::Result<usize> {
    let file = std::fs::File::create(path)?;
    write_axes(plot, std::io::BufWriter::new(file))
}

/// Writes [`write_plot`] output to a file.
pub fn write_plot_csv<P: AsRef<std::path::Path>>(plot: &coords::PlotData, path: P) -> error::Result<usize> {
    let file = std::fs::File::create(path)?;
    write_plot(plot, std::io::BufWriter::new(file))
}

/// Prints the first `count` points of each plotted series plus the axis
/// bounds, for a quick look at the output.
///
/// # Example Output
/// ```text
///  Actual Price (price)
///  - x: 564, y: 0.05
///  - x: 565, y: 0.07
///  bounds: x 564..5800, y 0.01..auto
///  x ticks: 564, 1000, 2000, 5800
///  epoch 0: x 564..1425
/// ```
pub fn print_preview(plot: &coords::PlotData, count: usize) {
    for series in &plot.series {
        println!(" {} ({})", series.kind.label(), series.kind.id());
        for point in series.points.iter().take(count) {
            match point.y {
                Some(y) => println!(" - x: {}, y: {:.2}", point.x, y),
                None => println!(" - x: {}, y: -", point.x),
            }
        }
    }
    let max_y = plot
        .bounds
        .max_y
        .map_or_else(|| "auto".to_string(), |y| format!("{:.2}", y));
    println!(
        " bounds: x {}..{}, y {:.2}..{}",
        plot.bounds.min_x, plot.bounds.max_x, plot.bounds.min_y, max_y
    );
    println!(" x ticks: {}", join_values(&plot.x_ticks));
    if !plot.y_ticks.is_empty() {
        println!(" y ticks: {}", join_values(&plot.y_ticks));
    }
    for epoch in &plot.epochs {
        println!(" epoch {}: x {}..{}", epoch.epoch, epoch.start_x, epoch.end_x);
    }
}

fn join_values(values: &[f64]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands;
    use crate::ticks;

    #[test]
    fn writes_long_format_rows_with_empty_gaps() {
        let plot = coords::PlotData {
            series: vec![coords::PlotSeries {
                kind: bands::BandKind::Price,
                points: vec![
                    coords::PlotPoint { x: 1.0, y: None },
                    coords::PlotPoint { x: 2.0, y: Some(3.5) },
                ],
            }],
            bounds: coords::AxisBounds { min_x: 1.0, max_x: 2.0, min_y: 0.0, max_y: None },
            x_ticks: vec![1.0, 2.0],
            y_ticks: Vec::new(),
            epochs: Vec::new(),
        };
        let mut out = Vec::new();
        let rows = write_plot(&plot, &mut out).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "band,x,y\nprice,1.0,\nprice,2.0,3.5\n");
    }

    #[test]
    fn writes_ticks_and_epochs_as_axis_rows() {
        let plot = coords::PlotData {
            series: Vec::new(),
            bounds: coords::AxisBounds { min_x: 1000.0, max_x: 3000.0, min_y: 0.5, max_y: Some(8.0) },
            x_ticks: vec![1000.0, 3000.0],
            y_ticks: vec![0.5, 8.0],
            epochs: vec![
                ticks::EpochRange { epoch: 1, start_x: 1000.0, end_x: 2744.0 },
                ticks::EpochRange { epoch: 2, start_x: 2744.0, end_x: 3000.0 },
            ],
        };
        let mut out = Vec::new();
        let rows = write_axes(&plot, &mut out).unwrap();
        assert_eq!(rows, 6);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "kind,index,start,end\n\
             x_tick,0,1000.0,\n\
             x_tick,1,3000.0,\n\
             y_tick,0,0.5,\n\
             y_tick,1,8.0,\n\
             epoch,1,1000.0,2744.0\n\
             epoch,2,2744.0,3000.0\n"
        );
    }
}
