use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blocktris::core::{project_ghost, Game, GameOptions, GameStatus, Grid};
use blocktris::types::{Direction, PieceKind, Point};

fn bench_advance(c: &mut Criterion) {
    let mut game = Game::new(GameOptions::default(), 12345);
    game.start_game();

    c.bench_function("game_advance_16ms", |b| {
        b.iter(|| {
            game.advance(black_box(16));
            if game.status() != GameStatus::Running {
                game.reset();
                game.start_game();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut grid = Grid::new(10, 22);
            // Fill bottom 4 rows with some debris above
            for y in 18..22 {
                for x in 0..10 {
                    grid.fill_position(x, y, PieceKind::I);
                }
            }
            for y in 12..18 {
                grid.fill_position(y % 10, y, PieceKind::T);
            }
            for y in 18..22 {
                grid.clear_line(y);
            }
            grid.push_lines(black_box(21));
            grid
        })
    });
}

fn bench_ghost(c: &mut Criterion) {
    let mut grid = Grid::new(10, 22);
    for y in 14..22 {
        for x in 0..9 {
            grid.fill_position((x + y) % 10, y, PieceKind::S);
        }
    }
    let piece = [
        Point::new(4, 0),
        Point::new(5, 0),
        Point::new(6, 0),
        Point::new(5, 1),
    ];

    c.bench_function("project_ghost", |b| {
        b.iter(|| project_ghost(black_box(&piece), &grid))
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut game = Game::new(GameOptions::default(), 12345);
    game.start_game();

    c.bench_function("hard_drop_and_spawn", |b| {
        b.iter(|| {
            if !game.hard_drop() {
                game.reset();
                game.start_game();
            }
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut game = Game::new(GameOptions::default(), 12345);
    game.start_game();
    let mut direction = Direction::Left;

    c.bench_function("move_piece", |b| {
        b.iter(|| {
            if !game.move_piece(black_box(direction)) {
                direction = match direction {
                    Direction::Left => Direction::Right,
                    _ => Direction::Left,
                };
            }
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut game = Game::new(GameOptions::default(), 12345);
    game.start_game();

    c.bench_function("rotate", |b| {
        b.iter(|| {
            game.rotate();
        })
    });
}

criterion_group!(
    benches,
    bench_advance,
    bench_line_clear,
    bench_ghost,
    bench_hard_drop,
    bench_move,
    bench_rotate
);
criterion_main!(benches);
