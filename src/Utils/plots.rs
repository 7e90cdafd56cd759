use crate::numerical::trapezoid::SampleGrid;

/// Draws the flow-rate curve with the trapezoid panels that the volume
/// estimate sums up, one shaded polygon per subinterval.
pub fn plot_trapezoids(grid: &SampleGrid, caption: &str, filename: &str) {
    use plotters::prelude::*;
    let x = &grid.nodes;
    let y = &grid.values;
    let x_min = x.min();
    let x_max = x.max();
    let y_min = y.min().min(0.0);
    let y_max = y.max().max(0.0);

    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root_area)
        .caption(caption, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_min..x_max, y_min * 1.05..y_max * 1.05)
        .unwrap();

    chart
        .configure_mesh()
        .x_desc("t [s]")
        .y_desc("F(t) [m^3/s]")
        .draw()
        .unwrap();

    // one panel per subinterval, anchored on the t axis
    for i in 0..grid.subintervals() {
        let panel = vec![
            (x[i], 0.0),
            (x[i], y[i]),
            (x[i + 1], y[i + 1]),
            (x[i + 1], 0.0),
        ];
        chart
            .draw_series(std::iter::once(Polygon::new(panel, RED.mix(0.2))))
            .unwrap();
    }

    let series: Vec<(f64, f64)> = x.iter().zip(y.iter()).map(|(&t, &f)| (t, f)).collect();
    chart
        .draw_series(LineSeries::new(series, &BLUE))
        .unwrap()
        .label(" F(t)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .unwrap();
}
