use std::error::Error;
use std::io::{self, Write};
use std::thread::sleep;

use mantis::config::GameConfig;
use mantis::game::PLAYER_COUNT;
use mantis::session::{Event, Session};

fn read_line() -> io::Result<Option<String>> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_owned()))
}

fn print_table(session: &Session) {
    let state = session.state();
    println!();
    for (i, p) in state.players.iter().enumerate() {
        let mark = if i == state.current { ">" } else { " " };
        println!("{} {}: {} ({} points) {}", mark, i + 1, p.name, p.score, p.tank);
    }
    if let Some(top) = state.top_card() {
        println!(
            "Deck: {} cards, top shows {}/{}/{}",
            state.deck.len(),
            top.back[0],
            top.back[1],
            top.back[2]
        );
    }
}

/// Ask the human seat for a move. `None` on end of input.
fn human_turn(session: &mut Session) -> io::Result<Option<()>> {
    let me = session.state().current;
    loop {
        print_table(session);
        print!("Score (s) or steal (t)? ");
        io::stdout().flush()?;
        let Some(choice) = read_line()? else {
            return Ok(None);
        };
        let ticket = match choice.as_str() {
            "s" => session.request_score(me),
            "t" => {
                print!("Steal from which seat [1-{}]? ", PLAYER_COUNT);
                io::stdout().flush()?;
                let Some(seat) = read_line()? else {
                    return Ok(None);
                };
                match seat.parse::<usize>() {
                    Ok(n) if n >= 1 => session.request_steal(me, n - 1),
                    _ => None,
                }
            }
            _ => None,
        };
        match ticket {
            Some(t) => {
                if let Some(card) = session.snapshot().revealed {
                    println!("The card is {}.", card.front);
                }
                sleep(session.config().reveal_delay());
                session.resolve(t);
                return Ok(Some(()));
            }
            None => println!("Invalid choice, try again."),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut config = GameConfig::default();
    if let Some(seed) = std::env::args().nth(1) {
        config.seed = Some(seed.parse()?);
    }

    println!("Play with a human player? [y/N]");
    let humans = match read_line()? {
        Some(answer) if answer.eq_ignore_ascii_case("y") => 1,
        _ => 0,
    };
    config.human_players = humans;
    if humans == 0 {
        config.think_delay_ms = 0;
        config.reveal_delay_ms = 0;
    }

    let mut session = Session::new(config)?;
    session.subscribe(|event| {
        if let Event::Log(line) = event {
            println!("{}", line);
        }
    });

    loop {
        let state = session.state();
        if state.is_over() || state.is_stalled() {
            break;
        }
        if session.computer_to_move() {
            let Some(thinking) = session.begin_computer_turn() else {
                break;
            };
            sleep(session.config().think_delay());
            let Some(revealed) = session.computer_decide(thinking) else {
                break;
            };
            sleep(session.config().reveal_delay());
            session.resolve(revealed);
        } else if human_turn(&mut session)?.is_none() {
            return Ok(());
        }
    }

    print_table(&session);
    match session.state().winner_name() {
        Some(name) => println!("{} wins!", name),
        None => println!("The deck is empty. Nobody wins."),
    }
    Ok(())
}
