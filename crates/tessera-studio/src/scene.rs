use tessera_engine::coords::{Point2D, Rectangle};
use tessera_engine::paint::{Color, FontSlant, FontWeight, LineCap, LineDash};
use tessera_engine::render::{CoordinateSystem, Renderer};

fn p(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

/// Demo scene in a 1000 × 1000 world.
pub fn draw_scene(g: &mut Renderer<'_>) {
    draw_rectangles(g);
    draw_lines(g);
    draw_polygons(g);
    draw_arcs(g);
    draw_text(g);
    draw_screen_overlay(g);
}

fn draw_rectangles(g: &mut Renderer<'_>) {
    g.set_color(Color::RED);
    g.draw_rectangle(p(100.0, 100.0), p(400.0, 300.0));
    g.draw_rectangle_size(p(10.0, 10.0), 50.0, 50.0);

    g.set_color_rgba(0, 255, 0, 128);
    g.fill_rectangle(p(500.0, 50.0), p(600.0, 300.0));
    g.fill_rectangle_size(p(500.0, 50.0), 50.0, 50.0);

    g.set_color(Color::DARK_SLATE_BLUE);
    g.fill_rect(Rectangle::new(p(650.0, 50.0), p(950.0, 120.0)));
}

fn draw_lines(g: &mut Renderer<'_>) {
    g.set_color(Color::BLACK);
    for (i, width) in [1.0, 3.0, 6.0, 10.0].into_iter().enumerate() {
        let y = 380.0 + 30.0 * i as f64;
        g.set_line_width(width);
        g.draw_line(p(50.0, y), p(400.0, y));
    }

    g.set_line_width(4.0);
    g.set_line_cap(LineCap::Round);
    g.set_line_dash(LineDash::Asymmetric5_3);
    g.draw_line(p(50.0, 520.0), p(400.0, 560.0));

    g.set_line_dash(LineDash::None);
    g.set_line_cap(LineCap::Butt);
    g.set_line_width(1.0);
}

fn draw_polygons(g: &mut Renderer<'_>) {
    g.set_color(Color::ORANGE);
    g.fill_poly(&[p(500.0, 400.0), p(650.0, 400.0), p(575.0, 520.0)]);

    g.set_color_with_alpha(Color::PURPLE, 160);
    g.fill_poly(&[
        p(620.0, 380.0),
        p(760.0, 420.0),
        p(720.0, 560.0),
        p(600.0, 520.0),
        p(560.0, 450.0),
    ]);

    // Entirely off the world; culled.
    g.fill_poly(&[p(-500.0, -500.0), p(-400.0, -500.0), p(-450.0, -400.0)]);
}

fn draw_arcs(g: &mut Renderer<'_>) {
    g.set_color(Color::BLUE);
    g.draw_arc(p(150.0, 750.0), 80.0, 0.0, 270.0);
    g.fill_arc(p(350.0, 750.0), 80.0, 30.0, 300.0);

    g.set_color(Color::FIRE_BRICK);
    g.draw_elliptic_arc(p(550.0, 750.0), 100.0, 50.0, 0.0, 360.0);

    g.set_color_with_alpha(Color::TURQUOISE, 140);
    g.fill_elliptic_arc(p(800.0, 750.0), 60.0, 120.0, 90.0, -180.0);
}

fn draw_text(g: &mut Renderer<'_>) {
    g.set_color_with_alpha(Color::BLUE, 153);
    g.format_font_sized("monospace", FontSlant::Oblique, FontWeight::Normal, 24.0);
    g.draw_text(p(250.0, 200.0), "Hello World!");

    g.set_color(Color::BLACK);
    g.format_font_sized("sans-serif", FontSlant::Normal, FontWeight::Bold, 14.0);
    for (i, angle) in [0.0, 45.0, 90.0, 135.0].into_iter().enumerate() {
        g.set_text_rotation(angle);
        g.draw_text(p(150.0 + 200.0 * i as f64, 920.0), &format!("{angle}°"));
    }
    g.set_text_rotation(0.0);

    let label_box = Rectangle::new(p(650.0, 50.0), p(950.0, 120.0));
    g.set_color(Color::WHITE);
    g.draw_text_in(label_box.centre(), "fits inside the box", &label_box);
    let label = "this label is far too long to fit in a small box";
    g.draw_text_bounded(label_box.centre(), label, 50.0, 10.0);
}

fn draw_screen_overlay(g: &mut Renderer<'_>) {
    g.set_coordinate_system(CoordinateSystem::Screen);
    g.set_color(Color::GREY_55);
    g.set_line_width(2.0);
    g.draw_rectangle(p(5.0, 5.0), p(105.0, 35.0));
    g.set_font_size(12.0);
    g.draw_text_bounded(p(55.0, 20.0), "screen space", 100.0, 30.0);
    g.set_coordinate_system(CoordinateSystem::World);
}
