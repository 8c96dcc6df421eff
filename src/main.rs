use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use quantum_chess::{ui_board, Cell, Color, Figure, Game, MatchInterface, PieceType, Square};

/** Scripted exhibition game: a couple of classical moves, two quantum
 * splits, an entanglement and a collapse. Pass an integer argument to seed
 * the collapse RNG, run with RUST_LOG=debug for engine logs. */
fn main() -> Result<()> {
    env_logger::init();
    let mut rng = match std::env::args().nth(1) {
        Some(arg) => {
            let seed: u64 = arg.parse().context("seed must be an integer")?;
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new();
    println!("Opening position:");
    render(&game);

    game.make_move(Square::new(6, 4), Square::new(4, 4))?; // e2-e4
    game.make_move(Square::new(1, 3), Square::new(3, 3))?; // d7-d5

    game.set_split_mode(true);
    game.split_move(Square::new(7, 5), Square::new(5, 3))?; // bishop f1~d3
    game.split_move(Square::new(7, 6), Square::new(5, 5))?; // knight g1~f3
    game.set_split_mode(false);
    println!("\nAfter two splits ({} quantum squares):", game.quantum_squares().len());
    render(&game);

    game.set_entangle_mode(true);
    game.select_for_entangle(Square::new(5, 3));
    game.select_for_entangle(Square::new(5, 5));

    info!("Collapsing the board");
    game.collapse_with(&mut rng);
    println!("\nAfter collapse ({} to move):", game.current_player());
    render(&game);

    println!("\nMove history:");
    for record in game.history() {
        println!("  {record}");
    }
    Ok(())
}

fn render(game: &Game) {
    for (rank, row) in ui_board(game).iter().enumerate() {
        print!("{} ", 8 - rank);
        for cell in row {
            match cell {
                Cell::Empty => print!(" . "),
                Cell::Figure(figure) => {
                    print!(" {}{}", symbol(figure), if figure.quantum { "~" } else { " " })
                }
            }
        }
        println!();
    }
    println!("   a  b  c  d  e  f  g  h");
}

fn symbol(figure: &Figure) -> char {
    match (figure.color, figure.kind) {
        (Color::White, PieceType::Pawn) => '♙',
        (Color::White, PieceType::Knight) => '♘',
        (Color::White, PieceType::Bishop) => '♗',
        (Color::White, PieceType::Rook) => '♖',
        (Color::White, PieceType::Queen) => '♕',
        (Color::White, PieceType::King) => '♔',
        (Color::Black, PieceType::Pawn) => '♟',
        (Color::Black, PieceType::Knight) => '♞',
        (Color::Black, PieceType::Bishop) => '♝',
        (Color::Black, PieceType::Rook) => '♜',
        (Color::Black, PieceType::Queen) => '♛',
        (Color::Black, PieceType::King) => '♚',
    }
}
