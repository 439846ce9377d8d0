//! Простая столбчатая диаграмма на inline SVG.

use leptos::prelude::*;

pub const CHART_WIDTH: f64 = 640.0;
pub const CHART_HEIGHT: f64 = 220.0;
const LABEL_SPACE: f64 = 24.0;
const BAR_GAP_RATIO: f64 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}

impl BarPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Геометрия одного столбца
#[derive(Clone, Debug, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub negative: bool,
}

/// Раскладка столбцов в области `width x height`.
///
/// Нулевая линия проходит через 0; отрицательные значения рисуются вниз от неё.
pub fn layout_bars(values: &[f64], width: f64, height: f64) -> (Vec<BarRect>, f64) {
    if values.is_empty() {
        return (Vec::new(), height);
    }
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let min = values.iter().cloned().fold(0.0_f64, f64::min);
    let span = if max - min > 0.0 { max - min } else { 1.0 };
    let baseline = height * max / span;
    if max == 0.0 && min == 0.0 {
        // все нули: линия внизу
        let slot = width / values.len() as f64;
        let bars = values
            .iter()
            .enumerate()
            .map(|(i, _)| BarRect {
                x: i as f64 * slot + slot * BAR_GAP_RATIO / 2.0,
                y: height,
                width: slot * (1.0 - BAR_GAP_RATIO),
                height: 0.0,
                negative: false,
            })
            .collect();
        return (bars, height);
    }

    let slot = width / values.len() as f64;
    let bars = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let h = v.abs() / span * height;
            BarRect {
                x: i as f64 * slot + slot * BAR_GAP_RATIO / 2.0,
                y: if *v >= 0.0 { baseline - h } else { baseline },
                width: slot * (1.0 - BAR_GAP_RATIO),
                height: h,
                negative: *v < 0.0,
            }
        })
        .collect();
    (bars, baseline)
}

#[component]
pub fn BarChart(
    #[prop(into)] title: String,
    #[prop(into)] points: Signal<Vec<BarPoint>>,
    /// Подпись значения над столбцом
    #[prop(optional)]
    format: Option<fn(f64) -> String>,
) -> impl IntoView {
    let format = format.unwrap_or(|v| format!("{:.0}", v));
    let plot_height = CHART_HEIGHT - LABEL_SPACE;

    let body = move || {
        let points = points.get();
        if points.is_empty() {
            return view! { <div class="bar-chart__empty">"Нет данных"</div> }.into_any();
        }
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let (bars, baseline) = layout_bars(&values, CHART_WIDTH, plot_height);

        let rects = bars
            .into_iter()
            .zip(points)
            .map(|(bar, point)| {
                let value_text = format(point.value);
                let label_x = (bar.x + bar.width / 2.0).to_string();
                let value_y = (bar.y - 4.0).max(10.0).to_string();
                let class = if bar.negative {
                    "bar-chart__bar bar-chart__bar--negative"
                } else {
                    "bar-chart__bar"
                };
                view! {
                    <g>
                        <rect
                            class=class
                            x=bar.x.to_string()
                            y=bar.y.to_string()
                            width=bar.width.to_string()
                            height=bar.height.to_string()
                            rx="2"
                        />
                        <text class="bar-chart__value" x=label_x.clone() y=value_y text-anchor="middle">
                            {value_text}
                        </text>
                        <text class="bar-chart__label" x=label_x y=(CHART_HEIGHT - 6.0).to_string() text-anchor="middle">
                            {point.label}
                        </text>
                    </g>
                }
            })
            .collect_view();

        view! {
            <svg
                class="bar-chart__svg"
                viewBox=format!("0 0 {} {}", CHART_WIDTH, CHART_HEIGHT)
                preserveAspectRatio="none"
            >
                <line
                    class="bar-chart__axis"
                    x1="0"
                    x2=CHART_WIDTH.to_string()
                    y1=baseline.to_string()
                    y2=baseline.to_string()
                />
                {rects}
            </svg>
        }
        .into_any()
    };

    view! {
        <div class="bar-chart">
            <div class="bar-chart__title">{title}</div>
            {body}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallest_bar_fills_height() {
        let (bars, baseline) = layout_bars(&[50.0, 100.0, 25.0], 300.0, 200.0);
        assert_eq!(baseline, 200.0);
        assert_eq!(bars[1].height, 200.0);
        assert_eq!(bars[1].y, 0.0);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[2].y, 150.0);
        assert_eq!(bars[0].x, 12.5);
        assert_eq!(bars[0].width, 75.0);
    }

    #[test]
    fn negative_values_hang_below_baseline() {
        let (bars, baseline) = layout_bars(&[100.0, -100.0], 200.0, 200.0);
        assert_eq!(baseline, 100.0);
        assert!(!bars[0].negative);
        assert_eq!(bars[0].y, 0.0);
        assert!(bars[1].negative);
        assert_eq!(bars[1].y, 100.0);
        assert_eq!(bars[1].height, 100.0);
    }

    #[test]
    fn empty_and_zero_series() {
        assert!(layout_bars(&[], 100.0, 100.0).0.is_empty());
        let (bars, baseline) = layout_bars(&[0.0, 0.0], 100.0, 80.0);
        assert_eq!(baseline, 80.0);
        assert!(bars.iter().all(|b| b.height == 0.0));
    }
}
