use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    Auto,
    Truecolor,
    Color256,
    Mono,
}

impl ColorSupport {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "truecolor" | "24bit" => ColorSupport::Truecolor,
            "256" | "256color" => ColorSupport::Color256,
            "mono" | "monochrome" => ColorSupport::Mono,
            _ => ColorSupport::Auto,
        }
    }
}

pub fn detect_color_support() -> ColorSupport {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorSupport::Truecolor;
    }
    ColorSupport::Color256
}

pub fn resolve_color_support(config: &str) -> ColorSupport {
    let parsed = ColorSupport::from_config_str(config);
    if parsed == ColorSupport::Auto {
        detect_color_support()
    } else {
        parsed
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub sparkline_color: Color,
    pub table_header_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// CPU cell colors for the <50% / <80% / >=80% bands.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str, support: ColorSupport) -> Self {
        let mut theme = match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        };

        if support == ColorSupport::Mono {
            theme = Self::mono();
        }

        theme.apply_color_support(support);
        theme
    }

    pub fn next(&self, support: ColorSupport) -> Self {
        if support == ColorSupport::Mono {
            return Self::mono();
        }
        let next_name = match self.name {
            "dark" => "light",
            _ => "dark",
        };
        Theme::from_config(next_name, support)
    }

    fn apply_color_support(&mut self, support: ColorSupport) {
        let map = |c: Color| adapt_color(c, support);

        self.header_accent_bg = map(self.header_accent_bg);
        self.header_accent_fg = map(self.header_accent_fg);
        self.statusbar_bg = map(self.statusbar_bg);
        self.overlay_border = map(self.overlay_border);
        self.text_primary = map(self.text_primary);
        self.text_secondary = map(self.text_secondary);
        self.accent = map(self.accent);
        self.pill_key_bg = map(self.pill_key_bg);
        self.pill_key_fg = map(self.pill_key_fg);
        self.pill_desc_fg = map(self.pill_desc_fg);
        self.surface_bg = map(self.surface_bg);
        self.gauge_filled = map(self.gauge_filled);
        self.gauge_unfilled = map(self.gauge_unfilled);
        self.sparkline_color = map(self.sparkline_color);
        self.table_header_fg = map(self.table_header_fg);
        self.selection_bg = map(self.selection_bg);
        self.selection_fg = map(self.selection_fg);
        self.heat_colors = self.heat_colors.map(map);
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Rgb(134, 239, 172),
            header_accent_fg: Color::Rgb(20, 24, 30),
            statusbar_bg: Color::Rgb(35, 40, 51),
            overlay_border: Color::Rgb(69, 71, 90),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(148, 155, 178),
            accent: Color::Rgb(134, 239, 172),
            pill_key_bg: Color::Rgb(250, 204, 21),
            pill_key_fg: Color::Rgb(20, 24, 30),
            pill_desc_fg: Color::Rgb(205, 214, 244),
            surface_bg: Color::Rgb(35, 40, 51),
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::Rgb(49, 50, 68),
            sparkline_color: Color::Rgb(251, 146, 60),
            table_header_fg: Color::Rgb(250, 204, 21),
            selection_bg: Color::Rgb(69, 71, 90),
            selection_fg: Color::Rgb(255, 255, 255),
            heat_colors: [
                Color::Rgb(134, 239, 172),
                Color::Rgb(251, 146, 60),
                Color::Rgb(248, 113, 113),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Rgb(30, 90, 180),
            header_accent_fg: Color::White,
            statusbar_bg: Color::Rgb(220, 220, 220),
            overlay_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            accent: Color::Rgb(30, 90, 180),
            pill_key_bg: Color::Rgb(30, 90, 180),
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Rgb(200, 200, 200),
            gauge_filled: Color::Rgb(70, 130, 180),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            sparkline_color: Color::Rgb(70, 130, 180),
            table_header_fg: Color::Rgb(30, 90, 180),
            selection_bg: Color::Rgb(180, 200, 230),
            selection_fg: Color::Black,
            heat_colors: [
                Color::Rgb(60, 140, 60),
                Color::Rgb(200, 140, 40),
                Color::Rgb(200, 60, 60),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            statusbar_bg: Color::Black,
            overlay_border: Color::White,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            accent: Color::White,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::Black,
            gauge_filled: Color::White,
            gauge_unfilled: Color::Black,
            sparkline_color: Color::White,
            table_header_fg: Color::White,
            selection_bg: Color::White,
            selection_fg: Color::Black,
            heat_colors: [Color::Gray, Color::White, Color::White],
        }
    }

    /// Color for a CPU utilization cell, banded by load.
    pub fn heat_for(&self, cpu_fraction: f64) -> Color {
        if cpu_fraction >= 0.8 {
            self.heat_colors[2]
        } else if cpu_fraction >= 0.5 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }
}

fn adapt_color(color: Color, support: ColorSupport) -> Color {
    match support {
        ColorSupport::Truecolor | ColorSupport::Auto => color,
        ColorSupport::Color256 => match color {
            Color::Rgb(r, g, b) => Color::Indexed(rgb_to_ansi256(r, g, b)),
            _ => color,
        },
        ColorSupport::Mono => match color {
            Color::Rgb(r, g, b) => {
                let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
                if luminance > 128.0 {
                    Color::White
                } else {
                    Color::Black
                }
            }
            Color::White | Color::Black | Color::Gray | Color::DarkGray => color,
            _ => Color::White,
        },
    }
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    let r = (r as f32 / 255.0 * 5.0).round() as u8;
    let g = (g as f32 / 255.0 * 5.0).round() as u8;
    let b = (b as f32 / 255.0 * 5.0).round() as u8;
    16 + 36 * r + 6 * g + b
}
